//! Error types for calgrid.

use thiserror::Error;

/// Errors that can occur in calgrid operations.
#[derive(Error, Debug)]
pub enum CalGridError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid month '{0}'. Expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Unknown category '{0}'. Expected one of: Work, Personal, Important")]
    UnknownCategory(String),
}

impl From<serde_json::Error> for CalGridError {
    fn from(e: serde_json::Error) -> Self {
        CalGridError::Serialization(e.to_string())
    }
}

/// Result type alias for calgrid operations.
pub type CalGridResult<T> = Result<T, CalGridError>;
