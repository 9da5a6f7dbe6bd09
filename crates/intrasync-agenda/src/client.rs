//! Google Calendar API client.

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::error::CalendarError;
use crate::types::{ApiEvent, EventListResponse, EventPayload};

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// How many upcoming events one reconciliation pass looks at.
const LIST_MAX_RESULTS: u32 = 250;

pub struct CalendarClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl CalendarClient {
    pub fn new(access_token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.to_string(),
            base_url: CALENDAR_API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub fn new_with_base_url(access_token: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.to_string(),
            base_url: base_url.to_string(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// List upcoming single events in a calendar, ordered by start time.
    #[instrument(skip(self), level = "info")]
    pub async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
    ) -> Result<Vec<ApiEvent>, CalendarError> {
        let url = format!(
            "{}/calendars/{}/events?timeMin={}&singleEvents=true&orderBy=startTime&maxResults={}",
            self.base_url,
            urlencoding::encode(calendar_id),
            urlencoding::encode(&time_min.to_rfc3339()),
            LIST_MAX_RESULTS,
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        let resp: EventListResponse = self.handle_response(response).await?;
        Ok(resp.items)
    }

    /// Create a new event.
    #[instrument(skip(self, payload), fields(summary = %payload.summary), level = "info")]
    pub async fn insert_event(
        &self,
        calendar_id: &str,
        payload: &EventPayload,
    ) -> Result<ApiEvent, CalendarError> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id),
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(payload)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Replace an existing event.
    #[instrument(skip(self, payload), fields(summary = %payload.summary), level = "info")]
    pub async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        payload: &EventPayload,
    ) -> Result<ApiEvent, CalendarError> {
        let url = format!(
            "{}/calendars/{}/events/{}",
            self.base_url,
            urlencoding::encode(calendar_id),
            urlencoding::encode(event_id),
        );

        let response = self
            .client
            .put(&url)
            .header("Authorization", self.auth_header())
            .json(payload)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CalendarError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| CalendarError::ApiError(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 401 {
            Err(CalendarError::TokenExpired)
        } else if status.as_u16() == 403 {
            Err(CalendarError::AuthRequired)
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(CalendarError::RateLimited(retry_after))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(CalendarError::ApiError(format!("{}: {}", status, text)))
        }
    }
}
