//! Error types for the runtime crate.

use thiserror::Error;

use crate::retry::FetchExhausted;

/// A single failed fetch attempt.
///
/// Every variant is transient: the retry policy decides how long to back off
/// before the next attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with an empty body.
    #[error("empty response body")]
    EmptyBody,

    /// The request did not complete within the HTTP timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

impl FetchError {
    /// Returns true for failures caused by connectivity rather than the server's answer.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, FetchError::Timeout(_) | FetchError::Network(_))
    }
}

/// Errors raised while delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The transport rejected or failed to send the message.
    #[error("failed to send notification: {0}")]
    Send(String),

    /// The notifier is not usable as configured.
    #[error("notifier misconfigured: {0}")]
    Configuration(String),
}

/// Errors that can occur in the runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Change-detection core error.
    #[error(transparent)]
    Core(#[from] pagewatch_core::CoreError),

    /// Snapshot store error.
    #[error("snapshot store error: {0}")]
    Persistence(#[from] pagewatch_persistence::PersistenceError),

    /// A fetch kept failing until the retry policy gave up.
    #[error(transparent)]
    FetchExhausted(#[from] FetchExhausted),

    /// The HTTP client could not be built.
    #[error("http client error: {0}")]
    Http(String),

    /// Runtime not started.
    #[error("runtime not started")]
    NotStarted,

    /// Runtime already started.
    #[error("runtime already started")]
    AlreadyStarted,

    /// Shutdown error.
    #[error("shutdown error: {0}")]
    Shutdown(String),
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_classification() {
        assert!(FetchError::Timeout("30s".into()).is_connectivity());
        assert!(FetchError::Network("refused".into()).is_connectivity());
        assert!(!FetchError::EmptyBody.is_connectivity());
        assert!(!FetchError::Status(503).is_connectivity());
    }
}
