//! Catalog engine: the HTTP client facade for the importer backend and the
//! background runtime that executes requests and timed poll steps.
mod api;
mod engine;
mod types;

pub use api::{ApiSettings, CatalogApi, ReqwestCatalogApi};
pub use engine::{EngineCommand, EngineEvent, EngineHandle};
pub use types::{
    ApiError, EngineError, FailureKind, ProductListQuery, ProductPayload, ProductRecord,
    ProgressReport, UploadReceipt, WebhookPayload, WebhookRecord, WebhookTestResult,
};
