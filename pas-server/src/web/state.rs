//! Application state for the web layer.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::geocoding::{GeocodeCache, GeocodingError, GeocodingService, NominatimClient};
use crate::pipeline::{FilterPipeline, PipelineConfig};
use crate::units::{CachedUnitClient, UnitApiClient, UnitApiError};

/// The pipeline as wired for the server.
pub type ServerPipeline = FilterPipeline<CachedUnitClient, NominatimClient>;

/// Failure to build the application state.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("unit API client: {0}")]
    UnitApi(#[from] UnitApiError),

    #[error("geocoder: {0}")]
    Geocoder(#[from] GeocodingError),
}

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Unit API client with cached catalogs
    pub units: Arc<CachedUnitClient>,

    /// Geocoding service with its cache, shared with the pipeline
    pub geocoding: Arc<GeocodingService<NominatimClient>>,

    /// Filter pipeline
    pub pipeline: Arc<ServerPipeline>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        units: CachedUnitClient,
        geocoding: GeocodingService<NominatimClient>,
        config: PipelineConfig,
    ) -> Self {
        let units = Arc::new(units);
        let geocoding = Arc::new(geocoding);
        let pipeline = Arc::new(FilterPipeline::new(
            units.clone(),
            geocoding.clone(),
            config,
        ));

        Self {
            units,
            geocoding,
            pipeline,
        }
    }

    /// Build every client from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let unit_client = UnitApiClient::new(config.unit_api.clone())?;
        let units = CachedUnitClient::new(unit_client, &config.catalogs);

        let nominatim = NominatimClient::new(config.geocoder.clone())?;
        let geocoding = GeocodingService::new(nominatim, GeocodeCache::new(&config.geocode_cache));

        Ok(Self::new(units, geocoding, config.pipeline.clone()))
    }
}
