//! Client error types.

use std::fmt;

use serde_json::Value;
use thiserror::Error;
use vstudio_models::ModelError;

/// Result type for client operations.
pub type StudioResult<T> = Result<T, StudioError>;

/// A non-success HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpFailure {
    pub status: u16,
    /// Human-readable `detail` read from the error payload, if any
    pub detail: Option<String>,
    pub body: String,
}

impl HttpFailure {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            status,
            detail: extract_detail(&body),
            body,
        }
    }
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "HTTP {}: {}", self.status, detail),
            None if self.body.is_empty() => write!(f, "HTTP {}", self.status),
            None => write!(f, "HTTP {}: {}", self.status, truncate(&self.body, 200)),
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Read a display string out of an error payload.
///
/// Understands `{"detail": "..."}`, validation lists
/// `{"detail": [{"msg": "..."}]}` and `{"message": "..."}`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => value
            .get("message")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    }
}

/// Errors that can occur while talking to the backends.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(HttpFailure),

    #[error("Not found: {0}")]
    NotFound(HttpFailure),

    #[error("Conflict: {0}")]
    Conflict(HttpFailure),

    #[error("Rate limited: {failure}")]
    RateLimited {
        retry_after_ms: Option<u64>,
        failure: HttpFailure,
    },

    #[error("Server error: {0}")]
    ServerError(HttpFailure),

    #[error("Request failed: {0}")]
    RequestFailed(HttpFailure),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

impl StudioError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Classify a non-success response.
    pub fn from_http_status(status: u16, body: impl Into<String>) -> Self {
        Self::from_http_response(status, body, None)
    }

    /// Classify a non-success response, keeping a `Retry-After` hint.
    pub fn from_http_response(status: u16, body: impl Into<String>, retry_after_ms: Option<u64>) -> Self {
        let failure = HttpFailure::new(status, body);
        match status {
            401 | 403 => Self::Unauthorized(failure),
            404 => Self::NotFound(failure),
            409 => Self::Conflict(failure),
            429 => Self::RateLimited {
                retry_after_ms,
                failure,
            },
            500..=599 => Self::ServerError(failure),
            _ => Self::RequestFailed(failure),
        }
    }

    /// Map a transport error, separating timeouts.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Network(err)
        }
    }

    fn failure(&self) -> Option<&HttpFailure> {
        match self {
            Self::Unauthorized(f)
            | Self::NotFound(f)
            | Self::Conflict(f)
            | Self::ServerError(f)
            | Self::RequestFailed(f) => Some(f),
            Self::RateLimited { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// HTTP status for response errors.
    pub fn http_status(&self) -> Option<u16> {
        self.failure().map(|f| f.status)
    }

    /// Server-provided detail string, if the payload had one.
    pub fn detail(&self) -> Option<&str> {
        self.failure().and_then(|f| f.detail.as_deref())
    }

    /// Message for the user: the server detail or the given fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::RateLimited { .. } | Self::ServerError(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
