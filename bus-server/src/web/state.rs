//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, NetworkCache};
use crate::planner::JourneyConfig;

/// Limits for nearby-stop searches.
#[derive(Debug, Clone)]
pub struct NearbyConfig {
    /// Radius used when the request does not give one (km).
    pub default_radius_km: f64,

    /// Largest radius a request may ask for (km).
    pub max_radius_km: f64,
}

impl Default for NearbyConfig {
    fn default() -> Self {
        Self {
            default_radius_km: 0.5,
            max_radius_km: 5.0,
        }
    }
}

/// Shared application state.
///
/// Contains all the services needed to handle requests.
pub struct AppState<S> {
    /// Bus data store
    pub store: Arc<S>,

    /// Cached route network for journey planning
    pub network: Arc<NetworkCache>,

    /// Journey time estimation parameters
    pub journey: Arc<JourneyConfig>,

    /// Nearby search limits
    pub nearby: Arc<NearbyConfig>,
}

// Manual impl: deriving would require `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            network: Arc::clone(&self.network),
            journey: Arc::clone(&self.journey),
            nearby: Arc::clone(&self.nearby),
        }
    }
}

impl<S> AppState<S> {
    /// Create a new app state.
    pub fn new(store: S, cache: &CacheConfig, journey: JourneyConfig, nearby: NearbyConfig) -> Self {
        Self {
            store: Arc::new(store),
            network: Arc::new(NetworkCache::new(cache)),
            journey: Arc::new(journey),
            nearby: Arc::new(nearby),
        }
    }
}
