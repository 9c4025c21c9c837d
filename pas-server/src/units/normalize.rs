//! Normalization of unit list responses.
//!
//! Different endpoints of the unit API wrap the list differently: under
//! `unidadesDeSaude`, `unidades` or `data`, or as a bare array, and some
//! responses nest each unit in a one-element array. Extraction is a list of
//! strategies tried in order; after extraction the list is unwrapped,
//! validated, deduplicated by id and sorted by wait time.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::{UnitRecord, UnitSummary};

use super::convert::convert_unit;
use super::types::RawUnit;

/// One way of locating the unit list inside a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// An array stored under this key.
    Field(&'static str),
    /// The payload is itself the array.
    BareArray,
}

impl Extraction {
    fn apply(self, payload: &Value) -> Option<&Vec<Value>> {
        match self {
            Extraction::Field(key) => payload.get(key).and_then(Value::as_array),
            Extraction::BareArray => payload.as_array(),
        }
    }
}

/// Strategies for list responses, highest priority first.
pub const UNIT_LIST_STRATEGIES: &[Extraction] = &[
    Extraction::Field("unidadesDeSaude"),
    Extraction::Field("unidades"),
    Extraction::Field("data"),
    Extraction::BareArray,
];

/// Keys that may hold a single unit in a detail response.
const UNIT_DETAIL_KEYS: &[&str] = &["unidadeDeSaude", "unidadesDeSaude"];

/// A normalized list response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedUnits {
    /// List-view projection, in display order.
    pub summaries: Vec<UnitSummary>,
    /// Full records in the same order, for the map.
    pub records: Vec<UnitRecord>,
}

impl NormalizedUnits {
    pub fn from_records(records: Vec<UnitRecord>) -> Self {
        let summaries = records.iter().map(UnitRecord::summary).collect();
        Self { summaries, records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Run the whole normalization on a list payload.
pub fn normalize(payload: &Value) -> NormalizedUnits {
    NormalizedUnits::from_records(normalize_records(payload))
}

/// Extract, unwrap, validate, deduplicate and sort.
pub fn normalize_records(payload: &Value) -> Vec<UnitRecord> {
    let records = extract_records(payload, UNIT_LIST_STRATEGIES);
    let mut records = dedup_by_id(records);
    sort_by_wait_time(&mut records);
    records
}

/// Extract, unwrap and validate, keeping response order.
pub fn extract_records(payload: &Value, strategies: &[Extraction]) -> Vec<UnitRecord> {
    extract_list(payload, strategies)
        .iter()
        .filter_map(unwrap_nested)
        .filter_map(to_record)
        .collect()
}

/// The first array found by the strategies, or an empty slice.
pub fn extract_list<'a>(payload: &'a Value, strategies: &[Extraction]) -> &'a [Value] {
    for strategy in strategies {
        if let Some(items) = strategy.apply(payload) {
            return items;
        }
    }

    debug!(
        kind = value_kind(payload),
        "unrecognized unit list shape, treating as empty"
    );
    &[]
}

/// Extract a single unit from a detail response.
///
/// Accepts `unidadeDeSaude` or `unidadesDeSaude`, each either an object or
/// an array whose first element is the unit.
pub fn extract_unit(payload: &Value) -> Option<UnitRecord> {
    UNIT_DETAIL_KEYS
        .iter()
        .filter_map(|key| payload.get(key))
        .find_map(|v| match v {
            Value::Array(items) => items.first().and_then(unwrap_nested),
            other => Some(other),
        })
        .and_then(to_record)
}

/// Keep the first record of every id, preserving order.
pub fn dedup_by_id(records: Vec<UnitRecord>) -> Vec<UnitRecord> {
    let mut seen = HashSet::new();
    records.into_iter().filter(|r| seen.insert(r.id)).collect()
}

/// Stable sort by wait time; unknown wait times go last.
pub fn sort_by_wait_time(records: &mut [UnitRecord]) {
    records.sort_by(|a, b| a.wait_time.cmp_by_minutes(&b.wait_time));
}

/// Unwrap `[unit]` to `unit`. An empty nested array yields nothing.
fn unwrap_nested(item: &Value) -> Option<&Value> {
    match item {
        Value::Array(inner) => inner.first(),
        other => Some(other),
    }
}

fn to_record(item: &Value) -> Option<UnitRecord> {
    let raw = match RawUnit::deserialize(item) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(error = %e, "dropping non-object unit entry");
            return None;
        }
    };

    match convert_unit(raw) {
        Ok(record) => Some(record),
        Err(e) => {
            debug!(error = %e, "dropping unit entry");
            None
        }
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
