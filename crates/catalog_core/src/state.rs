use std::time::Duration;

use crate::import::ImportState;
use crate::products::{ProductEditBuffer, ProductListState, DEFAULT_PAGE_SIZE};
use crate::view_model::{
    AppViewModel, FormMode, ImportView, ProductFormView, ProductRowView, ProductTableView,
    WebhookFormView, WebhookRowView, WebhookTableView,
};
use crate::webhooks::{WebhookEditBuffer, WebhookListState};
use crate::{ProductId, WebhookId, DEFAULT_POLL_INTERVAL};

/// Tunables the core needs; everything else about the backend lives in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreSettings {
    pub page_size: u64,
    pub poll_interval: Duration,
    /// Consecutive failed polls after which the import is reported as failed.
    pub max_poll_failures: u32,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_failures: 3,
        }
    }
}

/// Destructive action waiting for a yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteProduct(ProductId),
    DeleteAllProducts,
    DeleteWebhook(WebhookId),
}

impl ConfirmAction {
    pub fn prompt(&self) -> &'static str {
        match self {
            ConfirmAction::DeleteProduct(_) => "Are you sure you want to delete this product?",
            ConfirmAction::DeleteAllProducts => "Are you sure? This will delete ALL products!",
            ConfirmAction::DeleteWebhook(_) => "Delete this webhook?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub action: ConfirmAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    settings: CoreSettings,
    pub(crate) import: ImportState,
    pub(crate) products: ProductListState,
    pub(crate) product_edit: ProductEditBuffer,
    pub(crate) webhooks: WebhookListState,
    pub(crate) webhook_edit: WebhookEditBuffer,
    pub(crate) confirmation: Option<PendingConfirmation>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(CoreSettings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CoreSettings) -> Self {
        Self {
            settings,
            import: ImportState::default(),
            products: ProductListState::with_page_size(settings.page_size),
            product_edit: ProductEditBuffer::default(),
            webhooks: WebhookListState::default(),
            webhook_edit: WebhookEditBuffer::default(),
            confirmation: None,
            dirty: false,
        }
    }

    pub fn settings(&self) -> &CoreSettings {
        &self.settings
    }

    pub fn import(&self) -> &ImportState {
        &self.import
    }

    pub fn products(&self) -> &ProductListState {
        &self.products
    }

    pub fn product_edit(&self) -> &ProductEditBuffer {
        &self.product_edit
    }

    pub fn webhooks(&self) -> &WebhookListState {
        &self.webhooks
    }

    pub fn webhook_edit(&self) -> &WebhookEditBuffer {
        &self.webhook_edit
    }

    pub fn confirmation(&self) -> Option<&PendingConfirmation> {
        self.confirmation.as_ref()
    }

    /// True while an import or a list load still expects an answer.
    pub fn has_work_in_flight(&self) -> bool {
        self.import.is_active() || self.products.is_loading() || self.webhooks.is_loading()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            import: ImportView {
                status: self.import.status().map(ToOwned::to_owned),
                progress: self.import.indicator(),
            },
            products: ProductTableView {
                rows: self
                    .products
                    .rows()
                    .iter()
                    .map(ProductRowView::from)
                    .collect(),
                page: self.products.current_page(),
                page_label: format!("Page {}", self.products.current_page()),
                previous_enabled: self.products.has_previous(),
                next_enabled: self.products.has_next(),
                loading: self.products.is_loading(),
                filter: self.products.filter().clone(),
            },
            product_form: ProductFormView {
                mode: FormMode::from(self.product_edit.id()),
                fields: self.product_edit.fields().clone(),
            },
            webhooks: WebhookTableView {
                rows: self
                    .webhooks
                    .rows()
                    .iter()
                    .map(WebhookRowView::from)
                    .collect(),
                loading: self.webhooks.is_loading(),
            },
            webhook_form: WebhookFormView {
                mode: FormMode::from(self.webhook_edit.id()),
                fields: self.webhook_edit.fields().clone(),
            },
            confirmation: self
                .confirmation
                .map(|pending| pending.action.prompt().to_string()),
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
