//! Caching layer for the journey route network.
//!
//! Building the network reads every route entry in the database, which is
//! far too slow to repeat per request. Routes change rarely, so the built
//! network is cached with a TTL and shared between requests.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::info;

use crate::planner::RouteNetwork;
use crate::store::{BusStore, StoreError};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for the cached network.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
        }
    }
}

/// Cache holding the single current route network.
pub struct NetworkCache {
    network: MokaCache<(), Arc<RouteNetwork>>,
}

impl NetworkCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let network = MokaCache::builder().time_to_live(config.ttl).build();

        Self { network }
    }

    /// Get the cached network, building it from `store` if absent or expired.
    ///
    /// Concurrent callers during a rebuild wait for the same load instead of
    /// each reading every route.
    pub async fn get_or_load<S: BusStore>(&self, store: &S) -> Result<Arc<RouteNetwork>, Arc<StoreError>> {
        self.network
            .try_get_with((), async {
                let routes = store.all_routes().await?;
                let entries = routes.len();
                let network = RouteNetwork::build(routes);
                info!(entries, lines = network.len(), "built route network");
                Ok::<_, StoreError>(Arc::new(network))
            })
            .await
    }

    /// Drop the cached network so the next request rebuilds it.
    pub fn invalidate(&self) {
        self.network.invalidate_all();
    }
}
