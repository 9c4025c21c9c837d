//! PAS health unit finder server.
//!
//! Finds public health units that match a user's filters: specialty,
//! category, 24-hour availability and distance from the user. Unit data
//! comes from the PAS unit API; postal codes are geocoded with Nominatim.

pub mod batch;
pub mod config;
pub mod domain;
pub mod geocoding;
pub mod observability;
pub mod pipeline;
pub mod units;
pub mod web;
