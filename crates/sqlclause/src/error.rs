//! Error types for sqlclause

use thiserror::Error;

/// Result type alias for sqlclause operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised while building, rendering or executing a statement
#[derive(Debug, Error)]
pub enum SqlError {
    /// A bad identifier, column list, name or paging value was passed to a builder call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The statement cannot be rendered as a whole (empty FROM, duplicate CTE, ...).
    #[error("Structural error: {0}")]
    Structural(String),

    /// Dialect configuration could not be loaded or does not fit the requested operation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl SqlError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a structural error
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is a structural error
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural(_))
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
