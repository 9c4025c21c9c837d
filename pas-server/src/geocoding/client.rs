//! Nominatim geocoding client.
//!
//! Resolves Brazilian postal codes with the OpenStreetMap Nominatim search
//! API. Only the first result is used.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tokio::sync::Semaphore;

use crate::domain::{Cep, Coordinates};

use super::error::GeocodingError;
use super::service::Geocoder;

/// Default base URL for the Nominatim search endpoint.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim requires an identifying user agent.
const DEFAULT_USER_AGENT: &str = "PAS-TCC-App/1.0";

/// Country every query is restricted to.
const COUNTRY: &str = "Brazil";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// One search hit. Nominatim sends coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Base URL for the provider
    pub base_url: String,
    /// User-Agent sent with every request
    pub user_agent: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }
}

/// Nominatim API client.
///
/// Uses a semaphore to limit concurrent requests, on top of whatever
/// batching the caller does.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl NominatimClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GeocoderConfig) -> Result<Self, GeocodingError> {
        let mut headers = HeaderMap::new();

        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| GeocodingError::NotConfigured("invalid user agent".to_string()))?;
        headers.insert(USER_AGENT, user_agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Search for a postal code.
    ///
    /// Returns `Ok(None)` when the provider answers with an empty list.
    pub async fn search(&self, cep: &Cep) -> Result<Option<Coordinates>, GeocodingError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| GeocodingError::NotConfigured("semaphore closed".to_string()))?;

        let url = format!("{}/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("format", "json"),
                ("country", COUNTRY),
                ("postalcode", cep.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let places: Vec<Place> = serde_json::from_str(&body).map_err(|e| GeocodingError::Json {
            message: e.to_string(),
        })?;

        places.first().map(parse_place).transpose()
    }
}

impl Geocoder for NominatimClient {
    async fn geocode(&self, cep: &Cep) -> Result<Option<Coordinates>, GeocodingError> {
        self.search(cep).await
    }
}

fn parse_place(place: &Place) -> Result<Coordinates, GeocodingError> {
    let lat = parse_coordinate("lat", &place.lat)?;
    let lng = parse_coordinate("lon", &place.lon)?;
    Ok(Coordinates::new(lat, lng))
}

fn parse_coordinate(field: &'static str, value: &str) -> Result<f64, GeocodingError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeocodingError::InvalidCoordinate {
            field,
            value: value.to_string(),
        })
}
