//! Content repository client error types.

use std::sync::Arc;

/// Errors from the content repository API client.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Invalid base URL or path segment.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// No document exists at the requested path.
    #[error("not found: {0}")]
    NotFound(String),

    /// Authentication failed or rate limit exhausted (401/403).
    #[error("access denied: HTTP {status}")]
    AccessDenied { status: u16 },

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Response body exceeds the configured cap.
    #[error("response too large: {size} bytes exceeds {max_bytes}")]
    TooLarge { size: usize, max_bytes: usize },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Envelope content could not be decoded to UTF-8 text.
    #[error("decode error: {0}")]
    Decode(String),

    /// Envelope or document JSON could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { RepositoryError::Timeout } else { RepositoryError::Network(Arc::new(err)) }
    }
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }
}
