pub type ProductId = u64;
pub type WebhookId = u64;

/// Event a new webhook subscribes to unless the user picks another.
pub const DEFAULT_WEBHOOK_EVENT: &str = "product.created";

/// Events the backend fires webhooks for.
pub const WEBHOOK_EVENTS: [&str; 3] = ["product.created", "product.updated", "product.deleted"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
}

/// Editable field set of a product, as sent on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub active: bool,
}

impl Default for ProductFields {
    fn default() -> Self {
        Self {
            sku: String::new(),
            name: String::new(),
            description: String::new(),
            active: true,
        }
    }
}

impl From<&Product> for ProductFields {
    fn from(product: &Product) -> Self {
        Self {
            sku: product.sku.clone(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            active: product.active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductField {
    Sku(String),
    Name(String),
    Description(String),
    Active(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Webhook {
    pub id: WebhookId,
    pub url: String,
    pub event: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookFields {
    pub url: String,
    pub event: String,
    pub enabled: bool,
}

impl Default for WebhookFields {
    fn default() -> Self {
        Self {
            url: String::new(),
            event: DEFAULT_WEBHOOK_EVENT.to_string(),
            enabled: true,
        }
    }
}

impl From<&Webhook> for WebhookFields {
    fn from(webhook: &Webhook) -> Self {
        Self {
            url: webhook.url.clone(),
            event: webhook.event.clone(),
            enabled: webhook.enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookField {
    Url(String),
    Event(String),
    Enabled(bool),
}

/// Outcome of a backend-side test fire of one webhook.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookTestReport {
    pub status_code: u16,
    pub response_time_ms: f64,
}

impl WebhookTestReport {
    pub fn summary(&self) -> String {
        format!(
            "Status: {}, Time: {:.2} ms",
            self.status_code, self.response_time_ms
        )
    }
}

/// Product list filters as typed by the user. Empty strings mean "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductFilter {
    pub sku: String,
    pub name: String,
    pub active: String,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.sku.is_empty() && self.name.is_empty() && self.active.is_empty()
    }
}

/// One page request against the product listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub skip: u64,
    pub limit: u64,
    pub sku: Option<String>,
    pub name: Option<String>,
    pub active: Option<String>,
}

impl ProductQuery {
    /// Builds the query for a 1-based `page`; empty filter fields are omitted.
    pub fn for_page(page: u64, page_size: u64, filter: &ProductFilter) -> Self {
        Self {
            skip: page.saturating_sub(1) * page_size,
            limit: page_size,
            sku: non_empty(&filter.sku),
            name: non_empty(&filter.name),
            active: non_empty(&filter.active),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
