//! Common error types for PhishTour

use thiserror::Error;

/// Common result type for PhishTour operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across PhishTour services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure talking to a remote API
    #[error("Network error: {0}")]
    Network(String),

    /// Malformed payload from a remote API
    #[error("Parse error: {0}")]
    Parse(String),

    /// Requested resource not found in cache or remote
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller-initiated abort of an in-flight operation
    #[error("Operation cancelled")]
    Cancelled,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
