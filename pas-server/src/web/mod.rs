//! Web layer for the unit finder.
//!
//! Provides the geocoding proxy and JSON endpoints that run the filter
//! pipeline, look up single units and serve the filter catalogs.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, ServerPipeline, StartupError};
