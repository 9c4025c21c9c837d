//! Health unit records.

use serde::Serialize;

use super::{Cep, WaitTime};

/// Identifier assigned to a unit by the unit API.
pub type UnitId = i64;

/// Postal address of a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Normalized postal code, if the API supplied a usable one.
    pub cep: Option<Cep>,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
}

impl Address {
    /// One-line form: `street, neighborhood, city`, skipping blank parts.
    pub fn display_line(&self) -> String {
        [&self.street, &self.neighborhood, &self.city]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A public health unit, as normalized from an API response.
///
/// Records are built once per response and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRecord {
    pub id: UnitId,
    pub name: String,
    pub address: Address,
    pub phone: Option<String>,
    pub available_24h: bool,
    pub category: Option<String>,
    pub specialties: Vec<String>,
    pub wait_time: WaitTime,
}

impl UnitRecord {
    /// Postal code used for geocoding, if any.
    pub fn cep(&self) -> Option<&Cep> {
        self.address.cep.as_ref()
    }

    pub fn summary(&self) -> UnitSummary {
        UnitSummary {
            id: self.id,
            name: self.name.clone(),
            wait_time: self.wait_time.clone(),
        }
    }
}

/// The list-view projection of a unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSummary {
    pub id: UnitId,
    pub name: String,
    pub wait_time: WaitTime,
}
