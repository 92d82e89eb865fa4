//! Error types for outbound service calls.

use thiserror::Error;

/// Errors that can occur while dispatching an outbound call.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Scheme/host configuration is missing or empty.
    ///
    /// Raised before any network I/O takes place.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connection, DNS or protocol failure in the transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// Downstream service answered with a non-success status.
    #[error("downstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The call did not complete within its timeout.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Request or response body could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl HttpError {
    /// True for the errors surfaced by the transport itself
    /// (network failure, non-success status, timeout).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            HttpError::Transport(_) | HttpError::Status { .. } | HttpError::Timeout(_)
        )
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            HttpError::Configuration(_) => "configuration",
            HttpError::Transport(_) => "transport",
            HttpError::Status { .. } => "status",
            HttpError::Timeout(_) => "timeout",
            HttpError::Serialization(_) => "serialization",
        }
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        HttpError::Serialization(err.to_string())
    }
}

/// Result type for outbound calls.
pub type HttpResult<T> = Result<T, HttpError>;
