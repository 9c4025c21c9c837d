//! Data transfer objects for web requests and responses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinates, FilterSelection, UnitId, UnitRecord, UnitSummary};
use crate::pipeline::{LocatedUnit, PipelineOutput};
use crate::units::CatalogEntry;

/// Query for the geocoding proxy.
#[derive(Debug, Deserialize)]
pub struct GeocodingQuery {
    /// Postal code in any formatting
    pub cep: Option<String>,
}

/// Body of a unit search.
///
/// Keys follow the front end's Portuguese names.
#[derive(Debug, Default, Deserialize)]
pub struct SearchUnitsRequest {
    /// Filters chosen by the user
    #[serde(default)]
    pub filtros: FilterSelection,

    /// User's location, if shared
    #[serde(default)]
    pub localizacao: Option<Coordinates>,
}

/// Units matching a search.
#[derive(Debug, Serialize)]
pub struct SearchUnitsResponse {
    /// List rows, ordered by wait time
    pub units: Vec<UnitSummary>,

    /// Full records in the same order
    pub records: Vec<UnitRecord>,

    /// Distance in km by unit id, when the nearest-unit filter ran
    pub distances: HashMap<UnitId, f64>,
}

impl From<PipelineOutput> for SearchUnitsResponse {
    fn from(output: PipelineOutput) -> Self {
        Self {
            units: output.summaries,
            records: output.records,
            distances: output.distances,
        }
    }
}

/// A map pin.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub id: UnitId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Address line for the popup
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl MapMarker {
    pub fn new(located: LocatedUnit, distance_km: Option<f64>) -> Self {
        Self {
            id: located.unit.id,
            address: located.unit.address.display_line(),
            name: located.unit.name,
            lat: located.coords.lat,
            lng: located.coords.lng,
            distance_km,
        }
    }
}

/// Map pins for a search.
#[derive(Debug, Serialize)]
pub struct MapResponse {
    pub markers: Vec<MapMarker>,
}

/// One unit and where it is.
#[derive(Debug, Serialize)]
pub struct UnitDetailResponse {
    pub unit: UnitRecord,

    /// `null` when the unit's postal code does not resolve
    pub coords: Option<Coordinates>,
}

/// Query for the name search.
#[derive(Debug, Deserialize)]
pub struct NameSearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Units whose name matches.
#[derive(Debug, Serialize)]
pub struct NameSearchResponse {
    pub units: Vec<UnitSummary>,
}

/// Categories or specialties.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub items: Vec<CatalogEntry>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
