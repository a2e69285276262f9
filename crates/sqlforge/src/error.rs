//! Error types for sqlforge

use serde::Serialize;
use thiserror::Error;

/// Result type alias for sqlforge operations
pub type DbResult<T> = Result<T, DbError>;

/// A diagnostic reported by the database server.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ServerError {
    /// Server error number (e.g. `1049` for an unknown database).
    pub code: u16,
    /// Five character SQLSTATE (e.g. `42000`).
    pub sqlstate: String,
    pub message: String,
}

impl ServerError {
    pub fn new(code: u16, sqlstate: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            sqlstate: sqlstate.into(),
            message: message.into(),
        }
    }
}

/// Error types for statement building and database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Invalid enumerated argument or a query/result mismatch
    #[error("{0}")]
    InvalidArgument(String),

    /// Offset outside of the valid range
    #[error("{0}")]
    OutOfRange(String),

    /// Operation not allowed in the current state
    #[error("{0}")]
    Logic(String),

    /// Value of a type that cannot be quoted
    #[error("{0}")]
    Type(String),

    /// Error reported by the server
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Transport-level failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl DbError {
    /// Create an invalid-argument (validation) error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an out-of-range error
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::OutOfRange(message.into())
    }

    /// Create a logic (state) error
    pub fn logic(message: impl Into<String>) -> Self {
        Self::Logic(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this error was raised while validating builder input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::Type(_))
    }

    /// Check if this error was raised by a local state check.
    pub fn is_state(&self) -> bool {
        matches!(self, Self::Logic(_) | Self::OutOfRange(_))
    }

    /// Check if this error was reported by the server
    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server(_))
    }

    /// Check if this is a transport-level error
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Server error number, if the server reported this error.
    pub fn server_code(&self) -> Option<u16> {
        match self {
            Self::Server(err) => Some(err.code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_displays_message_only() {
        let err: DbError = ServerError::new(1049, "42000", "Unknown database 'Foo'").into();
        assert_eq!(err.to_string(), "Unknown database 'Foo'");
        assert_eq!(err.server_code(), Some(1049));
        assert!(err.is_server());
    }

    #[test]
    fn classification() {
        assert!(DbError::invalid_argument("x").is_validation());
        assert!(DbError::Type("x".into()).is_validation());
        assert!(DbError::logic("x").is_state());
        assert!(DbError::out_of_range("x").is_state());
        assert!(DbError::Connection("x".into()).is_connection());
        assert_eq!(DbError::logic("x").server_code(), None);
    }
}
