//! Unit API HTTP client.
//!
//! The unit API returns loosely shaped JSON, so list and detail methods hand
//! back the raw `serde_json::Value` and leave extraction to the normalizer.

use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use crate::domain::{RemoteFilter, UnitId};

use super::error::UnitApiError;
use super::source::UnitSource;

/// Default base URL for the unit API.
const DEFAULT_BASE_URL: &str = "https://api-tcc-node-js-1.onrender.com/v1/pas";

/// How much of an unparseable body to keep in errors.
const BODY_SNIPPET_CHARS: usize = 500;

/// Configuration for the unit API client.
#[derive(Debug, Clone)]
pub struct UnitApiConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl UnitApiConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for UnitApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Client for the unit API.
#[derive(Debug, Clone)]
pub struct UnitApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl UnitApiClient {
    /// Create a new unit API client.
    pub fn new(config: UnitApiConfig) -> Result<Self, UnitApiError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| UnitApiError::NotConfigured(format!("invalid base URL: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// `GET /unidades/`: every unit.
    pub async fn list_units(&self) -> Result<Value, UnitApiError> {
        let url = self.url(&["unidades", ""])?;
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    /// `POST /unidades/filtrar`: units matching a specialty and/or category.
    pub async fn filter_units(&self, filter: &RemoteFilter) -> Result<Value, UnitApiError> {
        let url = self.url(&["unidades", "filtrar"])?;
        debug!(?filter, "filtering units remotely");
        let response = self.http.post(url).json(filter).send().await?;
        read_json(response).await
    }

    /// `GET /unidades/{id}`: one unit.
    pub async fn unit_detail(&self, id: UnitId) -> Result<Value, UnitApiError> {
        let url = self.url(&["unidades", &id.to_string()])?;
        let response = self.http.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(UnitApiError::NotFound(id));
        }

        read_json(response).await
    }

    /// `GET /unidades/nome/{term}`: units whose name matches.
    pub async fn search_by_name(&self, term: &str) -> Result<Value, UnitApiError> {
        let url = self.url(&["unidades", "nome", term])?;
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    /// `GET /{path}` for the catalog endpoints.
    pub async fn catalog(&self, path: &str) -> Result<Value, UnitApiError> {
        let url = self.url(&[path])?;
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    /// Append percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, UnitApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                UnitApiError::NotConfigured("base URL cannot have a path".to_string())
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }
}

impl UnitSource for UnitApiClient {
    async fn list_units(&self) -> Result<Value, UnitApiError> {
        UnitApiClient::list_units(self).await
    }

    async fn filter_units(&self, filter: &RemoteFilter) -> Result<Value, UnitApiError> {
        UnitApiClient::filter_units(self, filter).await
    }

    async fn unit_detail(&self, id: UnitId) -> Result<Value, UnitApiError> {
        UnitApiClient::unit_detail(self, id).await
    }
}

/// Check the status and parse the body as JSON.
async fn read_json(response: reqwest::Response) -> Result<Value, UnitApiError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UnitApiError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|e| UnitApiError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
    })
}
