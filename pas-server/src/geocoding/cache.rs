//! In-memory cache of geocoding results.
//!
//! Keys are normalized postal codes. Both successful lookups and confirmed
//! failures are stored, so a bad postal code is only sent upstream once per
//! TTL window. Expiry is checked lazily on read; once the cache grows past
//! its size threshold every insert sweeps out expired entries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::{Cep, Coordinates};

/// Default TTL: 24 hours.
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default size above which expired entries are swept.
const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Configuration for the geocode cache.
#[derive(Debug, Clone)]
pub struct GeocodeCacheConfig {
    /// How long an entry stays valid.
    pub ttl: Duration,

    /// Size above which expired entries are swept on insert.
    pub max_entries: usize,
}

impl GeocodeCacheConfig {
    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the sweep threshold.
    pub fn with_max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }
}

impl Default for GeocodeCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Result of a cache lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CacheLookup {
    /// Resolved earlier, still fresh.
    Hit(Coordinates),
    /// Looked up earlier and known to be unresolvable.
    NegativeHit,
    /// Never looked up, or the entry has expired.
    Miss,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    coords: Option<Coordinates>,
    resolved_at: DateTime<Utc>,
}

/// Postal code → coordinates cache with TTL expiry.
pub struct GeocodeCache {
    entries: Mutex<HashMap<Cep, Entry>>,
    ttl: Duration,
    max_entries: usize,
    clock: Arc<dyn Clock>,
}

impl GeocodeCache {
    /// Create a cache that reads the system clock.
    pub fn new(config: &GeocodeCacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit clock.
    pub fn with_clock(config: &GeocodeCacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: config.ttl,
            max_entries: config.max_entries,
            clock,
        }
    }

    /// Look up a postal code. Expired entries are removed and reported as
    /// a miss.
    pub fn get(&self, cep: &Cep) -> CacheLookup {
        let now = self.clock.now();
        let mut entries = self.lock();

        let Some(entry) = entries.get(cep).copied() else {
            return CacheLookup::Miss;
        };

        if self.is_expired(&entry, now) {
            entries.remove(cep);
            return CacheLookup::Miss;
        }

        match entry.coords {
            Some(coords) => CacheLookup::Hit(coords),
            None => CacheLookup::NegativeHit,
        }
    }

    /// Record a lookup result. `None` records a confirmed failure.
    pub fn put(&self, cep: Cep, coords: Option<Coordinates>) {
        let now = self.clock.now();
        let mut entries = self.lock();

        entries.insert(
            cep,
            Entry {
                coords,
                resolved_at: now,
            },
        );

        if entries.len() > self.max_entries {
            let before = entries.len();
            entries.retain(|_, e| !self.is_expired(e, now));
            tracing::debug!(
                swept = before - entries.len(),
                remaining = entries.len(),
                "swept expired geocode entries"
            );
        }
    }

    /// Number of stored entries, including ones not yet found expired.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn is_expired(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        // A clock that went backwards counts as zero age.
        let age = now
            .signed_duration_since(entry.resolved_at)
            .to_std()
            .unwrap_or_default();
        age >= self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Cep, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Test clock that only moves when told to.
#[cfg(test)]
pub(crate) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Arc<Self> {
        let start = DateTime::parse_from_rfc3339("2024-03-15T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Arc::new(Self {
            now: Mutex::new(start),
        })
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(by).unwrap();
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
