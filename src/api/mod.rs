//! Client for the read-only statistics API.
//!
//! Every endpoint method issues exactly one GET and returns an
//! [`ApiResponse`]. Failures are values, never errors, so callers decide
//! per item whether to skip.

pub mod params;

use crate::domain::ports::ConfigProvider;
use self::params::{CategorySeriesParams, ObservationParams, QueryPairs, RealtimeWindow};
use reqwest::{Client, StatusCode};
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred/";

#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Status 200 with a JSON body.
    Success(Value),
    /// Anything else. `status` is `None` when no response arrived at all.
    Failure { status: Option<u16>, reason: String },
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiResponse::Success(value) => Some(value),
            ApiResponse::Failure { .. } => None,
        }
    }

    pub fn into_payload(self) -> Option<Value> {
        match self {
            ApiResponse::Success(value) => Some(value),
            ApiResponse::Failure { .. } => None,
        }
    }

    /// The array stored under `key` in a successful payload.
    pub fn nested_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.payload()?.get(key)?.as_array()
    }
}

#[derive(Debug, Clone)]
pub struct EconomicDataClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl EconomicDataClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            http: Client::new(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.base_url(), config.api_key())
    }

    /// Categories a series belongs to, under `categories`.
    pub async fn series_categories(&self, series_id: &str, window: &RealtimeWindow) -> ApiResponse {
        let mut query = vec![("series_id", series_id.to_string())];
        query.extend(window.query_pairs());
        self.get("series/categories", query).await
    }

    /// Series listed in a category, under `seriess`.
    pub async fn category_series(&self, category_id: &str, params: &CategorySeriesParams) -> ApiResponse {
        let mut query = vec![("category_id", category_id.to_string())];
        query.extend(params.query_pairs());
        self.get("category/series", query).await
    }

    /// Child categories, under `categories`.
    pub async fn category_children(&self, category_id: &str, window: &RealtimeWindow) -> ApiResponse {
        let mut query = vec![("category_id", category_id.to_string())];
        query.extend(window.query_pairs());
        self.get("category/children", query).await
    }

    /// Dated values of a series, under `observations`.
    pub async fn series_observations(&self, series_id: &str, params: &ObservationParams) -> ApiResponse {
        let mut query = vec![("series_id", series_id.to_string())];
        query.extend(params.query_pairs());
        self.get("series/observations", query).await
    }

    /// Series metadata, under `seriess`.
    pub async fn series(&self, series_id: &str, window: &RealtimeWindow) -> ApiResponse {
        let mut query = vec![("series_id", series_id.to_string())];
        query.extend(window.query_pairs());
        self.get("series", query).await
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get(&self, path: &str, filters: QueryPairs) -> ApiResponse {
        let url = self.endpoint_url(path);
        tracing::debug!("GET {} {:?}", url, filters);

        let mut query = vec![
            ("api_key", self.api_key.clone()),
            ("file_type", "json".to_string()),
        ];
        query.extend(filters);

        let response = match self.http.get(&url).query(&query).send().await {
            Ok(response) => response,
            Err(e) => {
                // The request URL carries the API key.
                let e = e.without_url();
                tracing::warn!("Request to {} failed: {}", path, e);
                return ApiResponse::Failure {
                    status: None,
                    reason: e.to_string(),
                };
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            let body: Option<Value> = response.json().await.ok();
            let reason = body
                .as_ref()
                .and_then(|b| b.get("error_message"))
                .and_then(Value::as_str)
                .or_else(|| status.canonical_reason())
                .unwrap_or("unexpected status")
                .to_string();
            tracing::warn!("{} returned status {}: {}", path, status.as_u16(), reason);
            return ApiResponse::Failure {
                status: Some(status.as_u16()),
                reason,
            };
        }

        match response.json::<Value>().await {
            Ok(body) => ApiResponse::Success(body),
            Err(e) => {
                let e = e.without_url();
                tracing::warn!("{} returned an unreadable body: {}", path, e);
                ApiResponse::Failure {
                    status: Some(status.as_u16()),
                    reason: format!("invalid JSON body: {}", e),
                }
            }
        }
    }
}
