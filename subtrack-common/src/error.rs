//! Common error types for subtrack

use thiserror::Error;

/// Common result type for subtrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across subtrack services
#[derive(Error, Debug)]
pub enum Error {
    /// Request rejected before any storage access
    #[error("{0}")]
    Validation(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for building a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// True for errors raised before storage was touched
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
