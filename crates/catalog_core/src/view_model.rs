use crate::{Product, ProductFields, ProductFilter, ProductId, Webhook, WebhookFields, WebhookId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub import: ImportView,
    pub products: ProductTableView,
    pub product_form: ProductFormView,
    pub webhooks: WebhookTableView,
    pub webhook_form: WebhookFormView,
    /// Prompt of the confirmation awaiting an answer.
    pub confirmation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportView {
    pub status: Option<String>,
    /// Percentage for the progress bar fill and label.
    pub progress: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductTableView {
    pub rows: Vec<ProductRowView>,
    pub page: u64,
    pub page_label: String,
    pub previous_enabled: bool,
    pub next_enabled: bool,
    pub loading: bool,
    pub filter: ProductFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRowView {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub status: &'static str,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            status: status_label(product.active),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Update(u64),
}

impl From<Option<u64>> for FormMode {
    fn from(id: Option<u64>) -> Self {
        id.map_or(FormMode::Create, FormMode::Update)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductFormView {
    pub mode: FormMode,
    pub fields: ProductFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WebhookTableView {
    pub rows: Vec<WebhookRowView>,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRowView {
    pub id: WebhookId,
    pub url: String,
    pub event: String,
    pub status: &'static str,
}

impl From<&Webhook> for WebhookRowView {
    fn from(webhook: &Webhook) -> Self {
        Self {
            id: webhook.id,
            url: webhook.url.clone(),
            event: webhook.event.clone(),
            status: status_label(webhook.enabled),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WebhookFormView {
    pub mode: FormMode,
    pub fields: WebhookFields,
}

fn status_label(flag: bool) -> &'static str {
    if flag {
        "Success"
    } else {
        "Error"
    }
}
