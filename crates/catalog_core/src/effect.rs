use std::path::PathBuf;
use std::time::Duration;

use crate::{JobHandle, ProductFields, ProductId, ProductQuery, WebhookFields, WebhookId};

/// Work requested by [`crate::update`] that the runtime must carry out.
///
/// Every request effect is answered by exactly one response [`crate::Msg`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Interactive notification for the user.
    Alert(String),
    UploadCsv { generation: u64, file: PathBuf },
    /// Fetch progress for `job` once `delay` has elapsed.
    PollProgress { job: JobHandle, delay: Duration },
    /// Load one page; the answer echoes `request`.
    FetchProducts { request: u64, query: ProductQuery },
    CreateProduct { fields: ProductFields },
    UpdateProduct { id: ProductId, fields: ProductFields },
    DeleteProduct { id: ProductId },
    DeleteAllProducts,
    FetchWebhooks { request: u64 },
    CreateWebhook { fields: WebhookFields },
    UpdateWebhook { id: WebhookId, fields: WebhookFields },
    DeleteWebhook { id: WebhookId },
    TestWebhook { id: WebhookId },
}
