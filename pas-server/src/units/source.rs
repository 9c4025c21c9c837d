//! The seam between the filter pipeline and the unit API.

use std::future::Future;

use serde_json::Value;

use crate::domain::{RemoteFilter, UnitId};

use super::error::UnitApiError;

/// Something that serves raw unit payloads.
///
/// Implemented by [`UnitApiClient`](super::UnitApiClient) and
/// [`CachedUnitClient`](super::CachedUnitClient); tests use an in-memory stub.
pub trait UnitSource: Send + Sync {
    /// Every unit.
    fn list_units(&self) -> impl Future<Output = Result<Value, UnitApiError>> + Send;

    /// Units matching a specialty and/or category.
    fn filter_units(
        &self,
        filter: &RemoteFilter,
    ) -> impl Future<Output = Result<Value, UnitApiError>> + Send;

    /// One unit's detail payload.
    fn unit_detail(&self, id: UnitId)
    -> impl Future<Output = Result<Value, UnitApiError>> + Send;
}
