//! Feed protocol error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Malformed record: {0}")]
    Malformed(String),

    #[error("Invalid {field}: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("Unknown correlation id: {0}")]
    UnknownRequest(u32),
}

pub type FeedResult<T> = Result<T, FeedError>;
