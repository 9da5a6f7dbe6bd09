//! Calendar and auth error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Authentication required")]
    AuthRequired,

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token file not found: {0} (run the OAuth consent flow first)")]
    TokenNotFound(String),

    #[error("Credentials file not found: {0}")]
    CredentialsNotFound(String),

    #[error("Malformed credentials file: {0}")]
    InvalidCredentials(String),

    #[error("Malformed token file: {0}")]
    InvalidToken(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
