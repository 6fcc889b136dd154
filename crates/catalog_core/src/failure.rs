use std::fmt;

/// Why a backend request did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// The request never got a response (connection, timeout, unreadable upload file).
    Transport { message: String },
    /// The backend answered with a non-2xx status, optionally with a `detail` text.
    Rejected { status: u16, detail: Option<String> },
    /// A 2xx response whose body was not the expected JSON.
    Malformed { message: String },
}

impl RequestFailure {
    /// Backend-provided detail text, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            RequestFailure::Rejected {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => Some(detail.as_str()),
            _ => None,
        }
    }

    pub fn detail_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.detail().unwrap_or(fallback)
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFailure::Transport { message } => write!(f, "transport failure: {message}"),
            RequestFailure::Rejected {
                status,
                detail: Some(detail),
            } => write!(f, "http status {status}: {detail}"),
            RequestFailure::Rejected { status, detail: None } => write!(f, "http status {status}"),
            RequestFailure::Malformed { message } => write!(f, "malformed response: {message}"),
        }
    }
}
