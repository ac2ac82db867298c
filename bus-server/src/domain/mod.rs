//! Domain types for the bus API.
//!
//! This module contains the document types stored in the database and the
//! validated identifiers used to query them. Identifier types enforce their
//! invariants at construction time, so code that receives them can trust
//! their validity.

mod journey;
mod point;
mod rating;
mod service_no;
mod stop;
mod stop_code;

pub use journey::{Journey, JourneySegment};
pub use point::{GeoJsonPoint, GeoPoint, InvalidPoint};
pub use rating::{InvalidRating, Rating, RatingSummary, ServiceRating};
pub use service_no::{Direction, InvalidDirection, InvalidServiceNo, ServiceNo};
pub use stop::{BusRoute, BusService, BusStop, ServiceStop};
pub use stop_code::{BusStopCode, InvalidBusStopCode};
