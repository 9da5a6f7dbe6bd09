//! Intra-specific error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntraError {
    #[error("Portal request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Portal returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid portal response: {0}")]
    InvalidResponse(String),

    #[error("Invalid portal timestamp: {0}")]
    InvalidTimestamp(String),
}
