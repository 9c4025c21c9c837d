//! Individual pipeline stages.
//!
//! Each stage is a plain function over owned records so the runner reads as
//! a straight sequence and stages can be tested on their own.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::batch::process_in_batches;
use crate::domain::{Availability, Coordinates, FilterSelection, RadiusKm, UnitRecord};
use crate::geocoding::{Geocoder, GeocodingService};
use crate::units::UnitSource;

/// A unit with resolved map coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedUnit {
    pub unit: UnitRecord,
    pub coords: Coordinates,
}

/// Fetch the raw unit payload for a selection.
///
/// Uses the remote filter endpoint when a specialty or category is set,
/// otherwise lists every unit. A failed request yields `Value::Null`, which
/// normalizes to an empty list.
pub async fn fetch_units<S: UnitSource>(source: &S, selection: &FilterSelection) -> Value {
    let result = match selection.remote_filter() {
        Some(filter) => source.filter_units(&filter).await,
        None => source.list_units().await,
    };

    result.unwrap_or_else(|e| {
        warn!(error = %e, "unit fetch failed, showing no units");
        Value::Null
    })
}

/// Keep units whose 24h flag matches the filter.
pub fn filter_by_availability(
    records: Vec<UnitRecord>,
    availability: Availability,
) -> Vec<UnitRecord> {
    if availability.is_either() {
        return records;
    }

    records
        .into_iter()
        .filter(|r| availability.accepts(r.available_24h))
        .collect()
}

/// Geocode every unit's postal code, `batch_size` at a time.
///
/// Units without a postal code, or whose code does not resolve, are
/// dropped. Order is preserved.
pub async fn locate_units<G: Geocoder>(
    geocoding: &GeocodingService<G>,
    records: Vec<UnitRecord>,
    batch_size: usize,
) -> Vec<LocatedUnit> {
    let total = records.len();

    let located: Vec<LocatedUnit> = process_in_batches(records, batch_size, |unit| async move {
        let cep = unit.cep().cloned()?;
        let coords = geocoding.lookup(&cep).await.coords()?;
        Some(LocatedUnit { unit, coords })
    })
    .await
    .into_iter()
    .flatten()
    .collect();

    debug!(total, located = located.len(), "units geocoded");
    located
}

/// Keep located units within `radius` of `origin`, paired with their
/// distance in kilometres.
pub fn filter_by_distance(
    located: Vec<LocatedUnit>,
    origin: Coordinates,
    radius: RadiusKm,
) -> Vec<(LocatedUnit, f64)> {
    let limit = radius.as_f64();

    located
        .into_iter()
        .filter_map(|l| {
            let distance = origin.distance_km(&l.coords);
            (distance <= limit).then_some((l, distance))
        })
        .collect()
}
