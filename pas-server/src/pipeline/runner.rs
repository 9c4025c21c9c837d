//! The filter pipeline: remote fetch, normalization, availability and
//! distance filtering, in that order.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{Coordinates, FilterSelection, UnitId, UnitRecord, UnitSummary};
use crate::geocoding::{Geocoder, GeocodingService};
use crate::units::{NormalizedUnits, UnitApiError, UnitSource, extract_unit, normalize};

use super::config::PipelineConfig;
use super::stages::{
    LocatedUnit, fetch_units, filter_by_availability, filter_by_distance, locate_units,
};

/// Result of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// List-view rows, ordered by wait time.
    pub summaries: Vec<UnitSummary>,

    /// Full records in the same order.
    pub records: Vec<UnitRecord>,

    /// Distance from the user in kilometres, keyed by unit id. Only filled
    /// when the distance stage ran.
    pub distances: HashMap<UnitId, f64>,
}

impl PipelineOutput {
    fn from_records(records: Vec<UnitRecord>) -> Self {
        let NormalizedUnits { summaries, records } = NormalizedUnits::from_records(records);
        Self {
            summaries,
            records,
            distances: HashMap::new(),
        }
    }

    fn from_nearby(nearby: Vec<(LocatedUnit, f64)>) -> Self {
        let mut distances = HashMap::with_capacity(nearby.len());
        let records = nearby
            .into_iter()
            .map(|(located, distance)| {
                distances.insert(located.unit.id, distance);
                located.unit
            })
            .collect();

        Self {
            distances,
            ..Self::from_records(records)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// The unit filter pipeline.
///
/// Holds the unit source and the geocoding service behind `Arc`s so one
/// pipeline can be shared by the web layer and any number of sessions.
pub struct FilterPipeline<S, G> {
    source: Arc<S>,
    geocoding: Arc<GeocodingService<G>>,
    config: PipelineConfig,
}

impl<S: UnitSource, G: Geocoder> FilterPipeline<S, G> {
    /// Create a new pipeline.
    pub fn new(
        source: Arc<S>,
        geocoding: Arc<GeocodingService<G>>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source,
            geocoding,
            config,
        }
    }

    /// Run every stage for a selection.
    ///
    /// The distance stage runs only when the user's location is known and
    /// the nearest-unit filter is on. Failures upstream degrade to an empty
    /// or shorter result; this never errors.
    pub async fn run(
        &self,
        selection: &FilterSelection,
        location: Option<Coordinates>,
    ) -> PipelineOutput {
        let payload = fetch_units(self.source.as_ref(), selection).await;

        let records = normalize(&payload).records;
        let fetched = records.len();

        let records = filter_by_availability(records, selection.availability);
        debug!(fetched, kept = records.len(), "availability filter applied");

        let origin = location.filter(|_| selection.nearest_unit);
        let output = match origin {
            Some(origin) => {
                let located =
                    locate_units(&self.geocoding, records, self.config.batch_size).await;
                let nearby = filter_by_distance(located, origin, selection.radius);
                PipelineOutput::from_nearby(nearby)
            }
            None => PipelineOutput::from_records(records),
        };

        info!(
            fetched,
            shown = output.len(),
            nearest = origin.is_some(),
            "pipeline run complete"
        );
        output
    }

    /// Fetch and normalize a single unit.
    pub async fn unit_detail(&self, id: UnitId) -> Result<UnitRecord, UnitApiError> {
        let payload = self.source.unit_detail(id).await?;
        extract_unit(&payload).ok_or(UnitApiError::NotFound(id))
    }

    /// Map coordinates for a unit, if its postal code resolves.
    pub async fn locate_unit(&self, unit: &UnitRecord) -> Option<Coordinates> {
        let cep = unit.cep()?;
        self.geocoding.lookup(cep).await.coords()
    }

    /// Map coordinates for a list of units; unresolved units are left out.
    pub async fn locate(&self, records: Vec<UnitRecord>) -> Vec<LocatedUnit> {
        locate_units(&self.geocoding, records, self.config.batch_size).await
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn geocoding(&self) -> &Arc<GeocodingService<G>> {
        &self.geocoding
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
