//! Error types for Quarry

use thiserror::Error;

/// The main error type for building and executing statements
#[derive(Error, Debug)]
pub enum Error {
    /// The statement could not be rendered
    #[error("Statement error: {0}")]
    Build(#[from] quarry_core::Error),

    /// Database connection or execution error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Row (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An executor failed without a driver error to report
    #[error("Execution error: {message}")]
    Execution { message: String },
}

/// Convenience Result type for Quarry operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }
}
