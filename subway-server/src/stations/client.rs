//! Upstream station feed client.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Station, StationId};

use super::error::StationError;

/// Wrapper for the stations response.
#[derive(Debug, Deserialize)]
pub struct StationsResponse {
    pub stations: Vec<StationDto>,
}

/// Station as served by the feed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationDto {
    pub id: i64,
    pub name: String,
}

impl From<StationDto> for Station {
    fn from(dto: StationDto) -> Self {
        Station::new(StationId(dto.id), dto.name)
    }
}

/// Configuration for the station feed client.
#[derive(Debug, Clone)]
pub struct StationClientConfig {
    /// Base URL of the feed
    pub base_url: String,
    /// Optional API key for x-apikey header authentication
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl StationClientConfig {
    /// Create a new config for the feed at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_secs: 30,
        }
    }

    /// Authenticate with an API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// Client for the upstream station feed.
#[derive(Debug, Clone)]
pub struct StationClient {
    http: reqwest::Client,
    base_url: String,
}

impl StationClient {
    /// Create a new feed client.
    pub fn new(config: StationClientConfig) -> Result<Self, StationError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let api_key_header = HeaderValue::from_str(key).map_err(|_| StationError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert(HeaderName::from_static("x-apikey"), api_key_header);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch all stations from the feed.
    pub async fn fetch_all(&self) -> Result<Vec<StationDto>, StationError> {
        let url = format!("{}/stations", self.base_url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(StationError::Unauthorized);
        }

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(error = %e, %status, "failed to read feed error body");
                    String::new()
                }
            };
            return Err(StationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let response: StationsResponse =
            serde_json::from_str(&body).map_err(|e| StationError::Json {
                message: e.to_string(),
            })?;

        Ok(response.stations)
    }
}
