//! Unified error types for show-details.
//!
//! Resolution failures never reach callers of `load`; they are normalized to
//! a not-found outcome at the source boundary. Only `NotImplemented` is meant
//! to be surfaced.

use tokio_rusqlite::rusqlite;

/// Unified error types for the show-details service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty show id).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The requested content does not exist or could not be located.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// Write operations are not supported by the content sources.
    #[error("NOT_IMPLEMENTED: {0}")]
    NotImplemented(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response or network failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl Error {
    /// Whether this error means "the content is absent" rather than "something broke".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotImplemented("save".to_string());
        assert!(err.to_string().contains("NOT_IMPLEMENTED"));
        assert!(err.to_string().contains("save"));
    }

    #[test]
    fn test_not_found_classification() {
        assert!(Error::NotFound("42".into()).is_not_found());
        assert!(!Error::NotImplemented("delete".into()).is_not_found());
        assert!(!Error::HttpError("status 500".into()).is_not_found());
    }
}
