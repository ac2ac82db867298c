//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::planner::JourneyConfig;
use crate::web::NearbyConfig;

const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "bus_go_home";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_NETWORK_TTL_SECS: u64 = 60 * 60;
/// Longest accepted network cache TTL (one year).
pub const MAX_NETWORK_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// A configuration value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {name}: {value:?} ({reason})")]
pub struct ConfigError {
    name: &'static str,
    value: String,
    reason: String,
}

/// Everything needed to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub mongodb_uri: String,
    pub database: String,
    pub bind_addr: SocketAddr,
    pub cache: CacheConfig,
    pub journey: JourneyConfig,
    pub nearby: NearbyConfig,
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    ///
    /// - `MONGODB_URI` (default `mongodb://localhost:27017`)
    /// - `MONGODB_DATABASE` (default `bus_go_home`)
    /// - `BIND_ADDR` (default `127.0.0.1:3000`)
    /// - `NETWORK_CACHE_TTL_SECS` (default 3600, at most one year)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind = var("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind.parse().map_err(|e: std::net::AddrParseError| ConfigError {
            name: "BIND_ADDR",
            value: bind.clone(),
            reason: e.to_string(),
        })?;

        let ttl = var("NETWORK_CACHE_TTL_SECS", &DEFAULT_NETWORK_TTL_SECS.to_string());
        let ttl_secs: u64 = ttl.parse().map_err(|e: std::num::ParseIntError| ConfigError {
            name: "NETWORK_CACHE_TTL_SECS",
            value: ttl.clone(),
            reason: e.to_string(),
        })?;
        if ttl_secs > MAX_NETWORK_TTL_SECS {
            return Err(ConfigError {
                name: "NETWORK_CACHE_TTL_SECS",
                value: ttl,
                reason: format!("must be at most {MAX_NETWORK_TTL_SECS} seconds"),
            });
        }

        Ok(Self {
            mongodb_uri: var("MONGODB_URI", DEFAULT_MONGODB_URI),
            database: var("MONGODB_DATABASE", DEFAULT_DATABASE),
            bind_addr,
            cache: CacheConfig {
                ttl: Duration::from_secs(ttl_secs),
            },
            journey: JourneyConfig::default(),
            nearby: NearbyConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.mongodb_uri, "mongodb://localhost:27017");
        assert_eq!(config.database, "bus_go_home");
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.cache.ttl, Duration::from_secs(3600));
    }

    #[test]
    fn overrides() {
        let config = from_pairs(&[
            ("MONGODB_URI", "mongodb://db:27017"),
            ("MONGODB_DATABASE", "lta"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("NETWORK_CACHE_TTL_SECS", "60"),
        ])
        .unwrap();

        assert_eq!(config.mongodb_uri, "mongodb://db:27017");
        assert_eq!(config.database, "lta");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
    }

    #[test]
    fn blank_values_use_defaults() {
        let config = from_pairs(&[("MONGODB_DATABASE", "  ")]).unwrap();
        assert_eq!(config.database, "bus_go_home");
    }

    #[test]
    fn invalid_values() {
        let err = from_pairs(&[("BIND_ADDR", "localhost")]).unwrap_err();
        assert!(err.to_string().starts_with("invalid value for BIND_ADDR: \"localhost\""));

        let err = from_pairs(&[("NETWORK_CACHE_TTL_SECS", "-5")]).unwrap_err();
        assert!(err.to_string().contains("NETWORK_CACHE_TTL_SECS"));

        let err = from_pairs(&[("NETWORK_CACHE_TTL_SECS", "99999999999")]).unwrap_err();
        assert!(err.to_string().contains("must be at most 31536000 seconds"));
    }

    #[test]
    fn longest_ttl_builds_cache() {
        let max = MAX_NETWORK_TTL_SECS.to_string();
        let config = from_pairs(&[("NETWORK_CACHE_TTL_SECS", max.as_str())]).unwrap();
        assert_eq!(config.cache.ttl, Duration::from_secs(MAX_NETWORK_TTL_SECS));

        let _cache = crate::cache::NetworkCache::new(&config.cache);
    }
}
