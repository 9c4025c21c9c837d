//! Caching layer for the unit API.
//!
//! Categories and specialties change rarely, so their lists are cached for an
//! hour. Unit lists are not cached here: wait times move and the pipeline
//! always wants fresh values.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::{CatalogId, RemoteFilter, UnitId, UnitSummary};

use super::client::UnitApiClient;
use super::error::UnitApiError;
use super::normalize::{Extraction, extract_records};
use super::source::UnitSource;
use super::types::RawNamed;

/// Shortest name-search term that reaches the API.
pub const MIN_SEARCH_CHARS: usize = 2;

/// Most results a name search returns.
pub const MAX_SEARCH_RESULTS: usize = 5;

const SEARCH_STRATEGIES: &[Extraction] = &[Extraction::Field("unidadesDeSaude")];

/// Which catalog to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Categories,
    Specialties,
}

impl CatalogKind {
    /// Path of the catalog endpoint.
    pub fn path(self) -> &'static str {
        match self {
            CatalogKind::Categories => "categoria",
            CatalogKind::Specialties => "especialidade",
        }
    }

    /// Response field holding the list.
    pub fn field(self) -> &'static str {
        match self {
            CatalogKind::Categories => "categorias",
            CatalogKind::Specialties => "especialidades",
        }
    }
}

/// A category or specialty the user can filter on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: CatalogId,
    pub name: String,
}

type CatalogList = Arc<Vec<CatalogEntry>>;

/// Configuration for the catalog cache.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// TTL for cached catalogs.
    pub ttl: Duration,
}

impl CatalogConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
        }
    }
}

/// Unit API client with cached catalogs.
pub struct CachedUnitClient {
    client: UnitApiClient,
    catalogs: MokaCache<CatalogKind, CatalogList>,
}

impl CachedUnitClient {
    /// Create a new cached client.
    pub fn new(client: UnitApiClient, config: &CatalogConfig) -> Self {
        let catalogs = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(2)
            .build();

        Self { client, catalogs }
    }

    pub async fn categories(&self) -> CatalogList {
        self.catalog(CatalogKind::Categories).await
    }

    pub async fn specialties(&self) -> CatalogList {
        self.catalog(CatalogKind::Specialties).await
    }

    /// Get a catalog, using the cache if available.
    ///
    /// A failed fetch yields an empty list and is not cached, so the next
    /// call tries again.
    pub async fn catalog(&self, kind: CatalogKind) -> CatalogList {
        if let Some(cached) = self.catalogs.get(&kind).await {
            return cached;
        }

        match self.client.catalog(kind.path()).await {
            Ok(payload) => {
                let entry = Arc::new(parse_catalog(kind, &payload));
                self.catalogs.insert(kind, entry.clone()).await;
                entry
            }
            Err(e) => {
                warn!(catalog = kind.path(), error = %e, "catalog fetch failed");
                Arc::default()
            }
        }
    }

    /// Units whose name matches `term`.
    ///
    /// Terms shorter than two characters after trimming return nothing
    /// without a request. Failures also return nothing.
    pub async fn search_by_name(&self, term: &str) -> Vec<UnitSummary> {
        let term = term.trim();
        if term.chars().count() < MIN_SEARCH_CHARS {
            return Vec::new();
        }

        match self.client.search_by_name(term).await {
            Ok(payload) => search_results(&payload),
            Err(e) => {
                warn!(term, error = %e, "name search failed");
                Vec::new()
            }
        }
    }
}

impl UnitSource for CachedUnitClient {
    async fn list_units(&self) -> Result<Value, UnitApiError> {
        self.client.list_units().await
    }

    async fn filter_units(&self, filter: &RemoteFilter) -> Result<Value, UnitApiError> {
        self.client.filter_units(filter).await
    }

    async fn unit_detail(&self, id: UnitId) -> Result<Value, UnitApiError> {
        self.client.unit_detail(id).await
    }
}

/// Read a catalog list, skipping entries without an id or a name.
pub fn parse_catalog(kind: CatalogKind, payload: &Value) -> Vec<CatalogEntry> {
    let Some(items) = payload.get(kind.field()).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| RawNamed::deserialize(item).ok())
        .filter_map(|raw| {
            let id = raw.id.as_ref().and_then(|id| id.as_i64())?;
            let name = raw.nome.filter(|n| !n.trim().is_empty())?;
            Some(CatalogEntry { id, name })
        })
        .collect()
}

/// The first few valid units of a name-search response.
pub fn search_results(payload: &Value) -> Vec<UnitSummary> {
    extract_records(payload, SEARCH_STRATEGIES)
        .iter()
        .take(MAX_SEARCH_RESULTS)
        .map(|r| r.summary())
        .collect()
}
