//! Transport error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("Connection refused: {0}")]
    Refused(String),

    #[error("Connect timed out: {0}")]
    ConnectTimeout(String),

    #[error("Address resolution failed: {0}")]
    Resolve(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetResult<T> = Result<T, NetError>;
