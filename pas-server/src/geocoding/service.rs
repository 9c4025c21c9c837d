//! Cached postal code resolution.
//!
//! Wraps a [`Geocoder`] with a [`GeocodeCache`]. Resolution never fails
//! outward: provider errors are logged and collapse to "unresolved", and
//! that outcome is cached like any other.

use std::future::Future;

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{Cep, Coordinates};

use super::cache::{CacheLookup, GeocodeCache};
use super::error::GeocodingError;

/// An upstream geocoding provider.
pub trait Geocoder: Send + Sync {
    /// Resolve a postal code. `Ok(None)` means the provider answered but
    /// found nothing.
    fn geocode(
        &self,
        cep: &Cep,
    ) -> impl Future<Output = Result<Option<Coordinates>, GeocodingError>> + Send;
}

/// Whether a resolution was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Value for the `X-Cache` response header.
    pub fn as_header(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// Outcome of a detailed lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup {
    Resolved {
        coords: Coordinates,
        cache: CacheStatus,
    },
    /// The provider has no match, now or on a cached earlier attempt.
    NotFound,
    /// This call hit a provider failure.
    Failed,
}

impl Lookup {
    pub fn coords(self) -> Option<Coordinates> {
        match self {
            Lookup::Resolved { coords, .. } => Some(coords),
            Lookup::NotFound | Lookup::Failed => None,
        }
    }
}

/// Geocoding with a result cache in front of the provider.
///
/// Concurrent misses for the same postal code each go upstream; the cache
/// only absorbs requests made after a lookup has completed.
pub struct GeocodingService<G> {
    geocoder: G,
    cache: GeocodeCache,
}

impl<G: Geocoder> GeocodingService<G> {
    pub fn new(geocoder: G, cache: GeocodeCache) -> Self {
        Self { geocoder, cache }
    }

    /// Resolve a raw postal code to coordinates.
    ///
    /// Input is normalized to digits; input without digits resolves to
    /// `None` without touching the provider or the cache.
    pub async fn resolve(&self, raw_cep: &str) -> Option<Coordinates> {
        match Cep::parse(raw_cep) {
            Ok(cep) => self.lookup(&cep).await.coords(),
            Err(e) => {
                debug!(cep = raw_cep, error = %e, "skipping geocode");
                None
            }
        }
    }

    /// Resolve an already-normalized postal code, reporting how the answer
    /// was obtained.
    pub async fn lookup(&self, cep: &Cep) -> Lookup {
        match self.cache.get(cep) {
            CacheLookup::Hit(coords) => {
                debug!(%cep, "geocode cache hit");
                return Lookup::Resolved {
                    coords,
                    cache: CacheStatus::Hit,
                };
            }
            CacheLookup::NegativeHit => {
                debug!(%cep, "geocode cache hit (unresolvable)");
                return Lookup::NotFound;
            }
            CacheLookup::Miss => {}
        }

        debug!(%cep, "geocoding via provider");
        match self.geocoder.geocode(cep).await {
            Ok(Some(coords)) => {
                self.cache.put(cep.clone(), Some(coords));
                Lookup::Resolved {
                    coords,
                    cache: CacheStatus::Miss,
                }
            }
            Ok(None) => {
                debug!(%cep, "no coordinates for postal code");
                self.cache.put(cep.clone(), None);
                Lookup::NotFound
            }
            Err(e) => {
                warn!(%cep, error = %e, "geocoding failed");
                self.cache.put(cep.clone(), None);
                Lookup::Failed
            }
        }
    }

    /// The underlying cache.
    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }
}
