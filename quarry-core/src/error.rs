//! Error types for Quarry

use thiserror::Error;

use crate::statement::StatementKind;

/// The main error type for statement building
#[derive(Error, Debug)]
pub enum Error {
    /// WHERE/HAVING criteria that cannot form a valid expression
    #[error("Malformed criteria: {message}")]
    MalformedCriteria { message: String },

    /// More than one statement-kind block is populated
    #[error("Ambiguous statement kind: {kinds:?} are all populated")]
    AmbiguousKind { kinds: Vec<StatementKind> },

    /// No statement-kind block is populated
    #[error("Empty statement: no SELECT, INSERT, REPLACE, UPDATE or DELETE target set")]
    EmptyStatement,

    /// An operator was given a value it cannot render
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// Configuration (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience Result type for statement building
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new malformed criteria error
    pub fn malformed_criteria(message: impl Into<String>) -> Self {
        Self::MalformedCriteria {
            message: message.into(),
        }
    }

    /// Create a new invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }
}
