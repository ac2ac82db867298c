//! Bus Go Home server.
//!
//! An HTTP API over Singapore bus stop, route and service data held in
//! MongoDB: stop lookups, nearby searches, service ratings, opposite stop
//! pairs and journey planning between two stops.

pub mod cache;
pub mod config;
pub mod domain;
pub mod geo;
pub mod opposite;
pub mod planner;
pub mod store;
pub mod web;
