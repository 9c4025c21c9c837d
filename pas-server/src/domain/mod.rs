//! Domain types for the unit finder.
//!
//! This module contains the validated values the rest of the server works
//! with: postal codes, coordinates, wait times, unit records and the user's
//! filter selection. Types enforce their invariants at construction time.

mod coords;
mod error;
mod filter;
mod panel;
mod postal_code;
mod unit;
mod wait_time;

pub use coords::Coordinates;
pub use error::DomainError;
pub use filter::{Availability, CatalogId, FilterSelection, RadiusKm, RemoteFilter};
pub use panel::UnitPanel;
pub use postal_code::{Cep, InvalidCep};
pub use unit::{Address, UnitId, UnitRecord, UnitSummary};
pub use wait_time::{UNKNOWN_WAIT, WaitTime};
