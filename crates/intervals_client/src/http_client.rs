//! HTTP client implementation for the intervals.icu API.
//!
//! This module provides a reqwest-based implementation of the
//! [`IntervalsApi`](crate::IntervalsApi) trait. Authentication is HTTP Basic
//! with the literal username `API_KEY` and the resolved key as password.

use crate::{
    Activity, Athlete, CalendarEvent, DEFAULT_STREAM_TYPES, DateRange, IntervalsApi,
    IntervalsError, WorkoutPlan,
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

/// Client for the intervals.icu API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestIntervalsClient {
    base_url: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl ReqwestIntervalsClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the intervals.icu API (e.g., "https://intervals.icu")
    /// * `api_key` - The API key for authentication
    pub fn new(base_url: &str, api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(&config.base_url, config.api_key.clone())
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .basic_auth("API_KEY", Some(self.api_key.expose_secret()))
    }

    /// Build an authenticated POST request.
    fn post_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .basic_auth("API_KEY", Some(self.api_key.expose_secret()))
    }

    /// Build an authenticated DELETE request.
    fn delete_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(url)
            .basic_auth("API_KEY", Some(self.api_key.expose_secret()))
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, IntervalsError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }

    /// Execute a request with no expected response body.
    async fn execute_empty(&self, request: reqwest::RequestBuilder) -> Result<(), IntervalsError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        Ok(())
    }
}

/// Extract error information from a failed response.
async fn error_from_response(resp: reqwest::Response) -> IntervalsError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let body_snippet: String = body.chars().take(256).collect();
    IntervalsError::from_status(status, body_snippet)
}

#[async_trait]
impl IntervalsApi for ReqwestIntervalsClient {
    async fn get_athlete(&self, athlete_id: &str) -> Result<Athlete, IntervalsError> {
        let url = format!("{}/api/v1/athlete/{}", self.base_url, athlete_id);
        self.execute_json(self.get_request(&url)).await
    }

    async fn list_activities(
        &self,
        athlete_id: &str,
        range: &DateRange,
    ) -> Result<Vec<Activity>, IntervalsError> {
        let url = format!("{}/api/v1/athlete/{}/activities", self.base_url, athlete_id);
        self.execute_json(self.get_request(&url).query(&range.query()))
            .await
    }

    async fn get_activity(&self, activity_id: &str) -> Result<Activity, IntervalsError> {
        let url = format!("{}/api/v1/activity/{}", self.base_url, activity_id);
        self.execute_json(self.get_request(&url)).await
    }

    async fn get_activity_streams(
        &self,
        activity_id: &str,
        types: Option<&[String]>,
    ) -> Result<serde_json::Value, IntervalsError> {
        let url = format!("{}/api/v1/activity/{}/streams", self.base_url, activity_id);
        let csv = match types {
            Some(t) => t.join(","),
            None => DEFAULT_STREAM_TYPES.join(","),
        };
        self.execute_json(self.get_request(&url).query(&[("types", csv)]))
            .await
    }

    async fn list_events(
        &self,
        athlete_id: &str,
        range: &DateRange,
    ) -> Result<Vec<CalendarEvent>, IntervalsError> {
        let url = format!("{}/api/v1/athlete/{}/events", self.base_url, athlete_id);
        self.execute_json(self.get_request(&url).query(&range.query()))
            .await
    }

    async fn create_event(
        &self,
        athlete_id: &str,
        plan: WorkoutPlan,
    ) -> Result<CalendarEvent, IntervalsError> {
        let url = format!("{}/api/v1/athlete/{}/events", self.base_url, athlete_id);

        let mut plan = plan;
        plan.start_date_local = crate::utils::normalize_event_start(&plan.start_date_local)
            .ok_or_else(|| {
                IntervalsError::InvalidInput(format!(
                    "invalid start_date_local: {}",
                    plan.start_date_local
                ))
            })?;

        self.execute_json(self.post_request(&url).json(&plan)).await
    }

    async fn delete_event(
        &self,
        athlete_id: &str,
        event_id: &str,
    ) -> Result<(), IntervalsError> {
        let url = format!(
            "{}/api/v1/athlete/{}/events/{}",
            self.base_url, athlete_id, event_id
        );
        self.execute_empty(self.delete_request(&url)).await
    }

    async fn list_wellness(
        &self,
        athlete_id: &str,
        range: &DateRange,
    ) -> Result<Vec<serde_json::Value>, IntervalsError> {
        let url = format!("{}/api/v1/athlete/{}/wellness", self.base_url, athlete_id);
        self.execute_json(self.get_request(&url).query(&range.query()))
            .await
    }

    async fn get_power_curve(
        &self,
        athlete_id: &str,
        range: &DateRange,
    ) -> Result<serde_json::Value, IntervalsError> {
        let url = format!(
            "{}/api/v1/athlete/{}/power-curves",
            self.base_url, athlete_id
        );
        self.execute_json(self.get_request(&url).query(&range.query()))
            .await
    }
}
