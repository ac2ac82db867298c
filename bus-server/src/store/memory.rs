//! In-memory store for tests and local development.
//!
//! Mirrors the query semantics of `MongoStore` over plain vectors, so
//! handlers behave the same against either backend.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{
    BusRoute, BusService, BusStop, BusStopCode, Direction, RatingSummary, ServiceNo, ServiceRating,
    ServiceStop,
};
use crate::geo::BoundingBox;

use super::{BusStore, StoreError};

#[derive(Debug, Default)]
struct Collections {
    stops: Vec<BusStop>,
    routes: Vec<BusRoute>,
    services: Vec<BusService>,
    ratings: Vec<ServiceRating>,
}

/// Store backed by in-process vectors.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with stops, routes and services.
    pub fn with_data(stops: Vec<BusStop>, routes: Vec<BusRoute>, services: Vec<BusService>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Collections {
                stops,
                routes,
                services,
                ratings: Vec::new(),
            })),
        }
    }

    /// All ratings recorded so far, oldest first.
    pub async fn ratings(&self) -> Vec<ServiceRating> {
        self.inner.read().await.ratings.clone()
    }

    /// Stop queries come back ordered by code, as `MongoStore` sorts them.
    fn sorted_stops<'a>(stops: impl Iterator<Item = &'a BusStop>) -> Vec<BusStop> {
        let mut stops: Vec<BusStop> = stops.cloned().collect();
        stops.sort_by_key(|s| s.bus_stop_code);
        stops
    }

    fn sorted_route(routes: &[BusRoute], service_no: &ServiceNo, direction: Direction) -> Vec<BusRoute> {
        let mut route: Vec<BusRoute> = routes
            .iter()
            .filter(|r| &r.service_no == service_no && r.direction == direction)
            .cloned()
            .collect();
        route.sort_by_key(|r| r.stop_sequence);
        route
    }
}

impl BusStore for MemoryStore {
    async fn find_stop(&self, code: &BusStopCode) -> Result<Option<BusStop>, StoreError> {
        let data = self.inner.read().await;
        Ok(data.stops.iter().find(|s| &s.bus_stop_code == code).cloned())
    }

    async fn find_stops(&self, codes: &[BusStopCode]) -> Result<Vec<BusStop>, StoreError> {
        let data = self.inner.read().await;
        Ok(Self::sorted_stops(
            data.stops.iter().filter(|s| codes.contains(&s.bus_stop_code)),
        ))
    }

    async fn stops_in_box(&self, bbox: &BoundingBox) -> Result<Vec<BusStop>, StoreError> {
        let data = self.inner.read().await;
        Ok(Self::sorted_stops(
            data.stops.iter().filter(|s| bbox.contains(s.latitude, s.longitude)),
        ))
    }

    async fn stops_on_road(&self, road_name: &str) -> Result<Vec<BusStop>, StoreError> {
        let data = self.inner.read().await;
        Ok(Self::sorted_stops(
            data.stops.iter().filter(|s| s.road_name == road_name),
        ))
    }

    async fn find_service(
        &self,
        service_no: &ServiceNo,
        direction: Direction,
    ) -> Result<Option<BusService>, StoreError> {
        let data = self.inner.read().await;
        Ok(data
            .services
            .iter()
            .find(|s| &s.service_no == service_no && s.direction == direction)
            .cloned())
    }

    async fn service_stops(
        &self,
        service_no: &ServiceNo,
        direction: Direction,
    ) -> Result<Vec<ServiceStop>, StoreError> {
        let data = self.inner.read().await;
        let stops: HashMap<BusStopCode, &BusStop> =
            data.stops.iter().map(|s| (s.bus_stop_code, s)).collect();

        Ok(Self::sorted_route(&data.routes, service_no, direction)
            .into_iter()
            .filter_map(|r| {
                let stop = stops.get(&r.bus_stop_code)?;
                Some(ServiceStop {
                    stop_sequence: r.stop_sequence,
                    distance: r.distance,
                    stop: (*stop).clone(),
                })
            })
            .collect())
    }

    async fn route(&self, service_no: &ServiceNo, direction: Direction) -> Result<Vec<BusRoute>, StoreError> {
        let data = self.inner.read().await;
        Ok(Self::sorted_route(&data.routes, service_no, direction))
    }

    async fn all_routes(&self) -> Result<Vec<BusRoute>, StoreError> {
        Ok(self.inner.read().await.routes.clone())
    }

    async fn rating_summary(
        &self,
        service_no: &ServiceNo,
        direction: Direction,
    ) -> Result<RatingSummary, StoreError> {
        let data = self.inner.read().await;
        Ok(RatingSummary::from_ratings(
            data.ratings
                .iter()
                .filter(|r| &r.service_no == service_no && r.direction == direction)
                .map(|r| r.rating),
        ))
    }

    async fn insert_rating(&self, rating: &ServiceRating) -> Result<(), StoreError> {
        self.inner.write().await.ratings.push(rating.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{GeoPoint, Rating};
    use crate::geo::test_support::stop_at;

    fn svc(s: &str) -> ServiceNo {
        ServiceNo::parse(s).unwrap()
    }

    fn code(s: &str) -> BusStopCode {
        BusStopCode::parse(s).unwrap()
    }

    fn route(service: &str, direction: Direction, seq: u32, stop: &str, distance: f64) -> BusRoute {
        BusRoute {
            service_no: svc(service),
            operator: "SBST".to_string(),
            direction,
            stop_sequence: seq,
            bus_stop_code: code(stop),
            distance,
            wd_first_bus: None,
            wd_last_bus: None,
            sat_first_bus: None,
            sat_last_bus: None,
            sun_first_bus: None,
            sun_last_bus: None,
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::with_data(
            vec![
                stop_at("00002", "B", 1.31, 103.80),
                stop_at("00003", "C", 1.32, 103.80),
                stop_at("00001", "A", 1.30, 103.80),
            ],
            vec![
                route("10", Direction::One, 3, "00003", 2.2),
                route("10", Direction::One, 1, "00001", 0.0),
                route("10", Direction::One, 2, "00002", 1.1),
                route("10", Direction::Two, 1, "00003", 0.0),
                route("10", Direction::One, 4, "00009", 3.0),
            ],
            vec![],
        )
    }

    #[tokio::test]
    async fn service_stops_sorted_and_joined() {
        let stops = store().service_stops(&svc("10"), Direction::One).await.unwrap();

        let codes: Vec<_> = stops.iter().map(|s| s.stop.bus_stop_code.as_str()).collect();
        // 00009 has no stop document and is dropped.
        assert_eq!(codes, vec!["00001", "00002", "00003"]);
        assert_eq!(stops[1].distance, 1.1);
    }

    #[tokio::test]
    async fn route_filters_by_direction() {
        let route = store().route(&svc("10"), Direction::Two).await.unwrap();
        assert_eq!(route.len(), 1);
        assert_eq!(route[0].bus_stop_code, code("00003"));
    }

    #[tokio::test]
    async fn box_query() {
        let bbox = BoundingBox::around(GeoPoint::new(1.30, 103.80).unwrap(), 1.5);
        let stops = store().stops_in_box(&bbox).await.unwrap();
        let codes: Vec<_> = stops.iter().map(|s| s.bus_stop_code.as_str()).collect();
        assert_eq!(codes, vec!["00001", "00002"]);
    }

    #[tokio::test]
    async fn find_stops_ordered_by_code() {
        let stops = store()
            .find_stops(&[code("00003"), code("00001"), code("00042")])
            .await
            .unwrap();
        let codes: Vec<_> = stops.iter().map(|s| s.bus_stop_code.as_str()).collect();
        assert_eq!(codes, vec!["00001", "00003"]);
    }

    #[tokio::test]
    async fn ratings_roundtrip() {
        let store = store();
        for value in [5, 3] {
            store
                .insert_rating(&ServiceRating {
                    service_no: svc("10"),
                    direction: Direction::One,
                    rating: Rating::new(value).unwrap(),
                    comment: None,
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }

        let summary = store.rating_summary(&svc("10"), Direction::One).await.unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.average, Some(4.0));

        let other = store.rating_summary(&svc("10"), Direction::Two).await.unwrap();
        assert_eq!(other.count, 0);
    }
}
