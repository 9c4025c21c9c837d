//! Postal code geocoding.
//!
//! Units are located on the map and filtered by distance using their CEP.
//! This module provides:
//! - a Nominatim client (`NominatimClient`)
//! - a TTL cache that also remembers unresolvable codes (`GeocodeCache`)
//! - the caching service the rest of the server calls (`GeocodingService`)

mod cache;
mod client;
mod error;
mod service;

pub use cache::{CacheLookup, Clock, GeocodeCache, GeocodeCacheConfig, SystemClock};
pub use client::{GeocoderConfig, NominatimClient};
pub use error::GeocodingError;
pub use service::{CacheStatus, Geocoder, GeocodingService, Lookup};

#[cfg(test)]
pub(crate) use cache::ManualClock;
#[cfg(test)]
pub(crate) use service::testing::StubGeocoder;
