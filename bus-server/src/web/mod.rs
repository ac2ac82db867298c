//! Web layer for the bus API.
//!
//! Provides HTTP endpoints for stops, services, ratings and journeys.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, NearbyConfig};
