//! Filter selection made by the user.
//!
//! The wire format keeps the Portuguese keys shared with the unit API and
//! the front end: `especialidade`, `categoria`, `disponibilidade`,
//! `unidadeProxima` and `distanciaRaio`.

use serde::{Deserialize, Deserializer, Serialize};

use super::DomainError;

/// Identifier of a specialty or category in the unit API.
pub type CatalogId = i64;

/// Tri-state 24-hour availability filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Option<u8>", into = "Option<u8>")]
pub enum Availability {
    /// No filter: every unit passes.
    #[default]
    Either,
    /// Only units open 24 hours.
    Yes,
    /// Only units not open 24 hours.
    No,
}

impl Availability {
    /// Whether a unit with the given 24h flag passes this filter.
    pub fn accepts(self, available_24h: bool) -> bool {
        match self {
            Availability::Either => true,
            Availability::Yes => available_24h,
            Availability::No => !available_24h,
        }
    }

    pub fn is_either(self) -> bool {
        self == Availability::Either
    }
}

impl TryFrom<Option<u8>> for Availability {
    type Error = DomainError;

    fn try_from(value: Option<u8>) -> Result<Self, Self::Error> {
        match value {
            None => Ok(Availability::Either),
            Some(1) => Ok(Availability::Yes),
            Some(0) => Ok(Availability::No),
            Some(other) => Err(DomainError::InvalidAvailability(other)),
        }
    }
}

impl From<Availability> for Option<u8> {
    fn from(value: Availability) -> Self {
        match value {
            Availability::Either => None,
            Availability::Yes => Some(1),
            Availability::No => Some(0),
        }
    }
}

/// Search radius for the nearest-unit filter.
///
/// Only the five slider stops are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RadiusKm {
    Five,
    #[default]
    Ten,
    Fifteen,
    Twenty,
    TwentyFive,
}

impl RadiusKm {
    pub const ALL: [RadiusKm; 5] = [
        RadiusKm::Five,
        RadiusKm::Ten,
        RadiusKm::Fifteen,
        RadiusKm::Twenty,
        RadiusKm::TwentyFive,
    ];

    pub fn km(self) -> u32 {
        match self {
            RadiusKm::Five => 5,
            RadiusKm::Ten => 10,
            RadiusKm::Fifteen => 15,
            RadiusKm::Twenty => 20,
            RadiusKm::TwentyFive => 25,
        }
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.km())
    }
}

impl TryFrom<u32> for RadiusKm {
    type Error = DomainError;

    fn try_from(km: u32) -> Result<Self, Self::Error> {
        RadiusKm::ALL
            .into_iter()
            .find(|r| r.km() == km)
            .ok_or(DomainError::InvalidRadius(km))
    }
}

impl From<RadiusKm> for u32 {
    fn from(value: RadiusKm) -> Self {
        value.km()
    }
}

/// The complete set of filters the user has chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(rename = "especialidade", default)]
    pub specialty: Option<CatalogId>,

    #[serde(rename = "categoria", default)]
    pub category: Option<CatalogId>,

    #[serde(rename = "disponibilidade", default)]
    pub availability: Availability,

    /// Restrict to units near the user. `null` on the wire means off.
    #[serde(
        rename = "unidadeProxima",
        default,
        deserialize_with = "null_as_false"
    )]
    pub nearest_unit: bool,

    #[serde(rename = "distanciaRaio", default)]
    pub radius: RadiusKm,
}

impl FilterSelection {
    /// The part of the selection the remote API filters on, if any of it
    /// is set.
    pub fn remote_filter(&self) -> Option<RemoteFilter> {
        if self.specialty.is_none() && self.category.is_none() {
            return None;
        }

        Some(RemoteFilter {
            especialidade: self.specialty,
            categoria: self.category,
        })
    }
}

/// Body of `POST /unidades/filtrar`. Unset keys are omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemoteFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub especialidade: Option<CatalogId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria: Option<CatalogId>,
}

fn null_as_false<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(d)?.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn availability_accepts() {
        assert!(Availability::Either.accepts(true));
        assert!(Availability::Either.accepts(false));
        assert!(Availability::Yes.accepts(true));
        assert!(!Availability::Yes.accepts(false));
        assert!(Availability::No.accepts(false));
        assert!(!Availability::No.accepts(true));
    }

    #[test]
    fn radius_only_slider_stops() {
        for km in [5, 10, 15, 20, 25] {
            assert_eq!(RadiusKm::try_from(km).unwrap().km(), km);
        }
        assert_eq!(RadiusKm::try_from(7), Err(DomainError::InvalidRadius(7)));
        assert_eq!(RadiusKm::try_from(0), Err(DomainError::InvalidRadius(0)));
        assert_eq!(RadiusKm::try_from(30), Err(DomainError::InvalidRadius(30)));
    }

    #[test]
    fn deserialize_full_selection() {
        let sel: FilterSelection = serde_json::from_value(json!({
            "especialidade": 3,
            "categoria": null,
            "disponibilidade": 1,
            "unidadeProxima": true,
            "distanciaRaio": 15
        }))
        .unwrap();

        assert_eq!(sel.specialty, Some(3));
        assert_eq!(sel.category, None);
        assert_eq!(sel.availability, Availability::Yes);
        assert!(sel.nearest_unit);
        assert_eq!(sel.radius, RadiusKm::Fifteen);
    }

    #[test]
    fn deserialize_defaults() {
        let sel: FilterSelection = serde_json::from_value(json!({
            "unidadeProxima": null
        }))
        .unwrap();

        assert_eq!(sel, FilterSelection::default());
        assert_eq!(sel.radius, RadiusKm::Ten);
        assert!(!sel.nearest_unit);
    }

    #[test]
    fn reject_bad_radius_and_flag() {
        let bad_radius = serde_json::from_value::<FilterSelection>(json!({ "distanciaRaio": 12 }));
        assert!(bad_radius.is_err());

        let bad_flag = serde_json::from_value::<FilterSelection>(json!({ "disponibilidade": 2 }));
        assert!(bad_flag.is_err());
    }

    #[test]
    fn serialize_roundtrips_wire_keys() {
        let sel = FilterSelection {
            availability: Availability::No,
            ..FilterSelection::default()
        };
        let json = serde_json::to_value(sel).unwrap();
        assert_eq!(json["disponibilidade"], 0);
        assert_eq!(json["distanciaRaio"], 10);
        assert_eq!(json["especialidade"], serde_json::Value::Null);
    }

    #[test]
    fn remote_filter_only_when_set() {
        assert!(FilterSelection::default().remote_filter().is_none());

        let sel = FilterSelection {
            category: Some(2),
            ..FilterSelection::default()
        };
        let body = serde_json::to_value(sel.remote_filter().unwrap()).unwrap();
        assert_eq!(body, json!({ "categoria": 2 }));
    }
}
