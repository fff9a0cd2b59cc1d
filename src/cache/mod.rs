//! Cache Module
//!
//! Bounded in-memory response cache with a fixed TTL per entry, capacity
//! eviction on write and a periodic expiry sweep.

mod entry;
mod manager;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use entry::CacheEntry;
pub use manager::CacheManager;
pub use stats::{CacheCounters, CacheStats};
pub use store::CacheStore;

// == Public Constants ==
/// Default lifetime of a cached response
pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(10 * 60);

/// Default ceiling on resident entries
pub const DEFAULT_MAX_CACHE_SIZE: usize = 1000;

/// Default cadence of the expiry sweep
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(10 * 60);

// == Cache Settings ==
/// Tunables for one [`CacheManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Lifetime of every entry, measured from insertion
    pub ttl: Duration,
    /// Maximum resident entries after any insert
    pub max_entries: usize,
    /// Interval between background expiry sweeps
    pub cleanup_interval: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_DURATION,
            max_entries: DEFAULT_MAX_CACHE_SIZE,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}
