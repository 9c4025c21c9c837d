//! Unit API client and response normalization.
//!
//! The unit API is the remote source of health units, categories and
//! specialties. Its responses are inconsistent about envelopes and field
//! types, so everything goes through [`normalize`] before the rest of the
//! server sees it.

mod cache;
mod client;
mod convert;
mod error;
pub mod normalize;
mod source;
mod types;

pub use cache::{
    CachedUnitClient, CatalogConfig, CatalogEntry, CatalogKind, MAX_SEARCH_RESULTS,
    MIN_SEARCH_CHARS,
};
pub use client::{UnitApiClient, UnitApiConfig};
pub use convert::{ConversionError, convert_unit};
pub use error::UnitApiError;
pub use normalize::{NormalizedUnits, extract_unit, normalize};
pub use source::UnitSource;
pub use types::RawUnit;

#[cfg(test)]
pub(crate) use source::testing::StaticUnitSource;
