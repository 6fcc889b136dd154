use crate::{Webhook, WebhookField, WebhookFields, WebhookId};

/// The full webhook list; there is no paging or filtering for webhooks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WebhookListState {
    rows: Vec<Webhook>,
    last_request: u64,
    /// Request number of the load whose answer will be applied.
    pending: Option<u64>,
}

impl WebhookListState {
    pub fn rows(&self) -> &[Webhook] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn find(&self, id: WebhookId) -> Option<&Webhook> {
        self.rows.iter().find(|webhook| webhook.id == id)
    }

    pub(crate) fn begin_load(&mut self) -> u64 {
        self.last_request += 1;
        self.pending = Some(self.last_request);
        self.last_request
    }

    /// Applies the answer to load `request`; `None` rows keep the current
    /// list. Returns `false` for an answer to a superseded load.
    pub(crate) fn finish_load(&mut self, request: u64, rows: Option<Vec<Webhook>>) -> bool {
        if self.pending != Some(request) {
            return false;
        }
        self.pending = None;
        if let Some(rows) = rows {
            self.rows = rows;
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WebhookEditBuffer {
    id: Option<WebhookId>,
    fields: WebhookFields,
}

impl WebhookEditBuffer {
    pub fn id(&self) -> Option<WebhookId> {
        self.id
    }

    pub fn fields(&self) -> &WebhookFields {
        &self.fields
    }

    pub(crate) fn load(&mut self, webhook: &Webhook) {
        self.id = Some(webhook.id);
        self.fields = WebhookFields::from(webhook);
    }

    /// Back to create mode: id, url and enabled reset, the chosen event is kept.
    pub(crate) fn reset_after_save(&mut self) {
        self.id = None;
        self.fields.url.clear();
        self.fields.enabled = true;
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn apply(&mut self, field: WebhookField) {
        match field {
            WebhookField::Url(url) => self.fields.url = url,
            WebhookField::Event(event) => self.fields.event = event,
            WebhookField::Enabled(enabled) => self.fields.enabled = enabled,
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        !self.fields.url.is_empty()
    }
}
