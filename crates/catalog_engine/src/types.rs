use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    #[serde(deserialize_with = "task_id_from_text_or_number")]
    pub task_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ProgressReport {
    pub progress: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductRecord {
    pub id: u64,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPayload {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookRecord {
    pub id: u64,
    pub url: String,
    pub event: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    pub url: String,
    pub event: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookTestResult {
    pub status_code: u16,
    pub response_time_ms: f64,
}

/// Parameters of `GET /products/`. `None` filters are left out of the URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductListQuery {
    pub skip: u64,
    pub limit: u64,
    pub sku: Option<String>,
    pub name: Option<String>,
    pub active: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// The upload file could not be opened or read.
    File,
    Timeout,
    Network,
    /// Non-2xx answer; `detail` is the backend's `{"detail": "..."}` text.
    HttpStatus { status: u16, detail: Option<String> },
    /// 2xx answer whose body did not match the expected shape.
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::File => write!(f, "file error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::HttpStatus { status, .. } => write!(f, "http status {status}"),
            FailureKind::Decode => write!(f, "unexpected response body"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("invalid base url {url:?}: {message}")]
    BaseUrl { url: String, message: String },
    #[error("failed to build http client: {0}")]
    Client(String),
}

fn task_id_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTaskId {
        Text(String),
        Number(u64),
    }

    Ok(match RawTaskId::deserialize(deserializer)? {
        RawTaskId::Text(text) => text,
        RawTaskId::Number(number) => number.to_string(),
    })
}
