//! File-based OAuth token handling.
//!
//! The interactive consent flow is out of scope; `token.json` must already
//! exist (the Google quickstart flow produces it). Expired access tokens
//! are refreshed with the client credentials from `credentials.json` and
//! the refreshed set is written back.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// OAuth client credentials, read from the Google `credentials.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct OauthClient {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: Option<OauthClient>,
    web: Option<OauthClient>,
}

impl OauthClient {
    /// Load client credentials from a Google credentials file, which nests
    /// them under `installed` or `web` depending on the app type.
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        if !path.exists() {
            return Err(AuthError::CredentialsNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let file: CredentialsFile = serde_json::from_str(&contents)
            .map_err(|e| AuthError::InvalidCredentials(e.to_string()))?;

        file.installed
            .or(file.web)
            .ok_or_else(|| {
                AuthError::InvalidCredentials(
                    "expected an \"installed\" or \"web\" client section".to_string(),
                )
            })
    }
}

/// Token set for OAuth2 authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Token expiration as a Unix timestamp
    pub expires_at: i64,
}

impl TokenSet {
    /// Check if the token needs refresh (within 5 minutes of expiry)
    pub fn needs_refresh(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at - 300
    }

    pub fn load(path: &Path) -> Result<Self, AuthError> {
        if !path.exists() {
            return Err(AuthError::TokenNotFound(path.display().to_string()));
        }

        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        std::fs::write(path, json)?;
        tracing::debug!("Stored refreshed token at {}", path.display());
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

/// Produce a usable access token from the token and credentials files,
/// refreshing and persisting it when it is about to expire.
pub async fn access_token(credentials_path: &Path, token_path: &Path) -> Result<String, AuthError> {
    let mut token = TokenSet::load(token_path)?;

    if token.needs_refresh() {
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or_else(|| AuthError::RefreshFailed("no refresh token on file".to_string()))?;
        let client = OauthClient::load(credentials_path)?;

        tracing::info!("Access token expired, refreshing");
        let refreshed = refresh(&client, &refresh_token, GOOGLE_TOKEN_URL).await?;

        token.access_token = refreshed.access_token;
        token.expires_at = chrono::Utc::now().timestamp() + refreshed.expires_in;
        if refreshed.refresh_token.is_some() {
            token.refresh_token = refreshed.refresh_token;
        }
        token.save(token_path)?;
    }

    Ok(token.access_token)
}

async fn refresh(
    client: &OauthClient,
    refresh_token: &str,
    token_url: &str,
) -> Result<RefreshResponse, AuthError> {
    let http = reqwest::Client::new();

    let response = http
        .post(token_url)
        .form(&[
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(AuthError::RefreshFailed(error_text));
    }

    response
        .json::<RefreshResponse>()
        .await
        .map_err(AuthError::Network)
}
