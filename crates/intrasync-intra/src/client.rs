//! HTTP client for the portal JSON endpoints.

use std::time::Duration;

use chrono::NaiveDate;
use tracing::instrument;

use crate::error::IntraError;
use crate::types::{Activity, ActivityList, Event, Module, ProjectRoster};

const PORTAL_BASE: &str = "https://intra.epitech.eu";
const PORTAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the portal. The autologin token is a URL path segment, so
/// every route goes through `{base}/{auth}/...`.
#[derive(Debug, Clone)]
pub struct IntraClient {
    client: reqwest::Client,
    base_url: String,
    auth: String,
}

impl IntraClient {
    pub fn new(auth: &str) -> Result<Self, IntraError> {
        let client = reqwest::Client::builder()
            .timeout(PORTAL_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: PORTAL_BASE.to_string(),
            auth: auth.to_string(),
        })
    }

    #[cfg(test)]
    pub fn new_with_base_url(auth: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            auth: auth.to_string(),
        }
    }

    /// Registered planning events over a date window.
    #[instrument(skip(self), level = "info")]
    pub async fn planning(
        &self,
        location: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Event>, IntraError> {
        let url = format!(
            "{}/{}/planning/load?format=json&location={}&onlymypromo=true&onlymymodule=true&start={}&end={}",
            self.base_url,
            self.auth,
            urlencoding::encode(location),
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        );

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Every module of the user's curriculum, all semesters.
    #[instrument(skip(self), level = "info")]
    pub async fn courses(&self) -> Result<Vec<Module>, IntraError> {
        let url = format!("{}/{}/course/filter?format=json", self.base_url, self.auth);

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Activities of one module.
    #[instrument(skip(self, module), fields(module = %module.code), level = "info")]
    pub async fn module_activities(&self, module: &Module) -> Result<Vec<Activity>, IntraError> {
        // trailing slash before the query, as the portal expects
        let url = format!("{}/?format=json", self.module_url(module));

        let response = self.client.get(&url).send().await?;
        let list: ActivityList = self.handle_response(response).await?;
        Ok(list.activities)
    }

    /// Group roster of one project activity.
    #[instrument(skip(self, module), fields(module = %module.code, acti = %code_acti), level = "info")]
    pub async fn project_roster(
        &self,
        module: &Module,
        code_acti: &str,
    ) -> Result<ProjectRoster, IntraError> {
        let url = format!(
            "{}/{}/project/?format=json",
            self.module_url(module),
            code_acti,
        );

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    fn module_url(&self, module: &Module) -> String {
        format!(
            "{}/{}/module/{}/{}/{}",
            self.base_url, self.auth, module.scholar_year, module.code, module.code_instance,
        )
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, IntraError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| IntraError::InvalidResponse(e.to_string()))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(IntraError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
