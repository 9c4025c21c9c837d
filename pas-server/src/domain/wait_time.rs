//! General wait time reported for a unit.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

/// The sentinel the API uses for an unknown wait time.
pub const UNKNOWN_WAIT: &str = "-";

/// Wait time as reported by the unit API.
///
/// The API sends `HH:MM:SS` strings, or `-` when the wait is unknown. The
/// original text is kept for display; ordering uses the parsed minutes, and
/// every unknown or unparseable value sorts after all known ones.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitTime {
    raw: String,
    minutes: Option<f64>,
}

impl WaitTime {
    /// Parse a wait time. Never fails: anything that is not `HH:MM:SS`
    /// becomes an unknown wait time that keeps its text.
    pub fn parse(s: &str) -> Self {
        let raw = s.trim();
        if raw.is_empty() {
            return Self::unknown();
        }

        Self {
            raw: raw.to_string(),
            minutes: parse_hms_minutes(raw),
        }
    }

    /// An unknown wait time, displayed as `-`.
    pub fn unknown() -> Self {
        Self {
            raw: UNKNOWN_WAIT.to_string(),
            minutes: None,
        }
    }

    /// Minutes as `H*60 + M + S/60`, or `None` when unknown.
    pub fn minutes(&self) -> Option<f64> {
        self.minutes
    }

    /// Sort key: unknown values map to positive infinity.
    pub fn sort_key(&self) -> f64 {
        self.minutes.unwrap_or(f64::INFINITY)
    }

    pub fn is_known(&self) -> bool {
        self.minutes.is_some()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Total ordering on the sort key.
    pub fn cmp_by_minutes(&self, other: &WaitTime) -> Ordering {
        self.sort_key().total_cmp(&other.sort_key())
    }
}

impl Default for WaitTime {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for WaitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for WaitTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

fn parse_hms_minutes(s: &str) -> Option<f64> {
    let mut parts = s.split(':');
    let (h, m, sec) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let h: u32 = h.trim().parse().ok()?;
    let m: u32 = m.trim().parse().ok()?;
    let sec: u32 = sec.trim().parse().ok()?;

    Some(f64::from(h) * 60.0 + f64::from(m) + f64::from(sec) / 60.0)
}
