//! Error types for jobboard

use thiserror::Error;

/// Result type alias for jobboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for query compilation and model operations
#[derive(Debug, Error)]
pub enum Error {
    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Record already exists
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// An update payload contained nothing to change
    #[error("No updatable fields in payload")]
    NoUpdatableFields,

    /// A filter criterion name not recognized for the entity
    #[error("Invalid filter: {0}")]
    InvalidFilterKey(String),

    /// A lower bound exceeds its paired upper bound in a range filter
    #[error("Invalid range: minimum {min} exceeds maximum {max}")]
    InvalidRange { min: i64, max: i64 },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a duplicate error
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    /// Parse a tokio_postgres error into a more specific Error
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::Duplicate(format!("{}: {}", constraint, message)),
                "23503" => return Self::ForeignKey(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}
