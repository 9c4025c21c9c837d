//! Unit filter pipeline.
//!
//! A run answers "which units match what the user picked?":
//!
//! 1. fetch from the unit API (remote filter or full list)
//! 2. normalize the response
//! 3. keep units matching the 24h availability filter
//! 4. if the user asked for nearby units and their location is known,
//!    geocode each unit and keep those inside the radius
//!
//! [`FilterSession`] drives runs for one user: debounced on selection
//! changes, immediate on location changes, newest result wins.

mod config;
mod debounce;
mod runner;
mod sequencer;
mod session;
mod stages;

pub use config::PipelineConfig;
pub use debounce::Debouncer;
pub use runner::{FilterPipeline, PipelineOutput};
pub use sequencer::{Sequencer, Token};
pub use session::{FilterSession, SessionState};
pub use stages::{
    LocatedUnit, fetch_units, filter_by_availability, filter_by_distance, locate_units,
};
