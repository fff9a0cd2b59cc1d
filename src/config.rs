//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheSettings;

/// Default upstream API the proxy forwards to.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.themoviedb.org";

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Lifetime of a cached response in seconds
    pub cache_duration: u64,
    /// Maximum number of cached responses
    pub max_cache_size: usize,
    /// Expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Scheme and host requests are forwarded to, without a trailing slash
    pub upstream_base_url: String,
    /// Upstream request timeout in seconds
    pub upstream_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DURATION` - Cached response lifetime in seconds (default: 600)
    /// - `MAX_CACHE_SIZE` - Maximum cached responses (default: 1000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 600)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `UPSTREAM_BASE_URL` - Upstream API base URL (default: https://api.themoviedb.org)
    /// - `UPSTREAM_TIMEOUT` - Upstream request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_duration: env_or("CACHE_DURATION", defaults.cache_duration),
            max_cache_size: env_or("MAX_CACHE_SIZE", defaults.max_cache_size),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .ok()
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.upstream_base_url),
            upstream_timeout: env_or("UPSTREAM_TIMEOUT", defaults.upstream_timeout),
        }
    }

    /// Returns the cache-manager part of the configuration.
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            ttl: Duration::from_secs(self.cache_duration),
            max_entries: self.max_cache_size,
            cleanup_interval: Duration::from_secs(self.cleanup_interval),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_duration: 600,
            max_cache_size: 1000,
            cleanup_interval: 600,
            server_port: 8080,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            upstream_timeout: 30,
        }
    }
}

/// Parses `name` from the environment, falling back to `default` when unset
/// or unparseable.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
