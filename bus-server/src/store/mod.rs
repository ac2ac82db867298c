//! Access to the bus stop, route, service and rating collections.
//!
//! Handlers only talk to the `BusStore` trait. `MongoStore` is the
//! production implementation; `MemoryStore` holds everything in process and
//! backs the tests.

mod error;
mod memory;
mod mongo;

use std::future::Future;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use mongo::MongoStore;

use crate::domain::{
    BusRoute, BusService, BusStop, BusStopCode, Direction, RatingSummary, ServiceNo, ServiceRating,
    ServiceStop,
};
use crate::geo::BoundingBox;

/// Collection holding `BusStop` documents.
pub const BUS_STOPS: &str = "bus_stops";
/// Collection holding `BusRoute` documents.
pub const BUS_ROUTES: &str = "bus_routes";
/// Collection holding `BusService` documents.
pub const BUS_SERVICES: &str = "bus_services";
/// Collection holding `ServiceRating` documents.
pub const BUS_SERVICE_RATINGS: &str = "bus_service_ratings";

/// Read and write access to the bus network data.
pub trait BusStore: Send + Sync + 'static {
    /// Look up a single stop.
    fn find_stop(
        &self,
        code: &BusStopCode,
    ) -> impl Future<Output = Result<Option<BusStop>, StoreError>> + Send;

    /// Look up several stops at once. Unknown codes are skipped.
    fn find_stops(
        &self,
        codes: &[BusStopCode],
    ) -> impl Future<Output = Result<Vec<BusStop>, StoreError>> + Send;

    /// Stops whose latitude and longitude fall inside `bbox`.
    fn stops_in_box(
        &self,
        bbox: &BoundingBox,
    ) -> impl Future<Output = Result<Vec<BusStop>, StoreError>> + Send;

    /// Stops on the named road, ordered by stop code.
    fn stops_on_road(
        &self,
        road_name: &str,
    ) -> impl Future<Output = Result<Vec<BusStop>, StoreError>> + Send;

    /// Look up a service in one direction.
    fn find_service(
        &self,
        service_no: &ServiceNo,
        direction: Direction,
    ) -> impl Future<Output = Result<Option<BusService>, StoreError>> + Send;

    /// The stops a service calls at, in route order, joined with the stop
    /// documents. Route entries whose stop is missing are dropped.
    fn service_stops(
        &self,
        service_no: &ServiceNo,
        direction: Direction,
    ) -> impl Future<Output = Result<Vec<ServiceStop>, StoreError>> + Send;

    /// Raw route entries for a service, ordered by stop sequence.
    fn route(
        &self,
        service_no: &ServiceNo,
        direction: Direction,
    ) -> impl Future<Output = Result<Vec<BusRoute>, StoreError>> + Send;

    /// Every route entry of every service.
    fn all_routes(&self) -> impl Future<Output = Result<Vec<BusRoute>, StoreError>> + Send;

    /// Rating statistics for a service.
    fn rating_summary(
        &self,
        service_no: &ServiceNo,
        direction: Direction,
    ) -> impl Future<Output = Result<RatingSummary, StoreError>> + Send;

    /// Record a new rating.
    fn insert_rating(
        &self,
        rating: &ServiceRating,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
