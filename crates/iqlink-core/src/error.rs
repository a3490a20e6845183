//! Error types for iqlink-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Invalid {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Result type alias for core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
