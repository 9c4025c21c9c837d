//! Server configuration sourced from environment variables.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::geocoding::{GeocodeCacheConfig, GeocoderConfig};
use crate::pipeline::PipelineConfig;
use crate::units::{CatalogConfig, UnitApiConfig};

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub unit_api: UnitApiConfig,
    pub geocoder: GeocoderConfig,
    pub geocode_cache: GeocodeCacheConfig,
    pub catalogs: CatalogConfig,
    pub pipeline: PipelineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            unit_api: UnitApiConfig::default(),
            geocoder: GeocoderConfig::default(),
            geocode_cache: GeocodeCacheConfig::default(),
            catalogs: CatalogConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment. Unset variables
    /// keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = parse_var(&lookup, "PAS_BIND_ADDR")? {
            config.bind_addr = addr;
        }
        if let Some(url) = lookup("PAS_API_BASE_URL") {
            config.unit_api = config.unit_api.with_base_url(url);
        }
        if let Some(url) = lookup("GEOCODER_BASE_URL") {
            config.geocoder = config.geocoder.with_base_url(url);
        }
        if let Some(ua) = lookup("GEOCODER_USER_AGENT") {
            config.geocoder = config.geocoder.with_user_agent(ua);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "GEOCODE_CACHE_TTL_SECS")? {
            config.geocode_cache = config.geocode_cache.with_ttl(Duration::from_secs(secs));
        }
        if let Some(max) = parse_var(&lookup, "GEOCODE_CACHE_MAX_ENTRIES")? {
            config.geocode_cache = config.geocode_cache.with_max_entries(max);
        }
        if let Some(size) = parse_var::<usize, _>(&lookup, "PIPELINE_BATCH_SIZE")? {
            if size == 0 {
                return Err(ConfigError::Invalid {
                    var: "PIPELINE_BATCH_SIZE",
                    value: size.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            config.pipeline = config.pipeline.with_batch_size(size);
        }

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };

    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value,
            reason: e.to_string(),
        })
}
