//! Journey planning between two bus stops.
//!
//! Segment time is distance-based: every ride is assumed to run at a fixed
//! average speed, and each change of service adds a fixed penalty. The same
//! rules drive both the search and the validator, so a planned journey
//! always validates.

mod config;
mod estimate;
mod network;
mod search;
mod validate;

pub use config::JourneyConfig;
pub use estimate::{SegmentError, segment_distance_km};
pub use network::{Line, RouteNetwork};
pub use search::{PlanError, Planner};
pub use validate::{DEFAULT_TIME_TOLERANCE_MINS, JourneyValidationError, validate_journey};
