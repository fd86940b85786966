/// Unified error types for the client core
use thiserror::Error;

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network-level failures: connection, timeout, malformed response body
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the backend, carrying the server's message
    #[error("Server error ({status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Client-side validation failures, blocked before submission
    #[error("Validation error: {0}")]
    Validation(#[from] crate::validation::ValidationError),

    /// An authorized call was attempted with no active session
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Durable session storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
