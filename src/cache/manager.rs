//! Cache Manager Module
//!
//! Thread-safe handle over the cache store. Many lookups proceed in
//! parallel under the read lock; inserts and sweeps take the write lock and
//! serialize against each other and against lookups.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheCounters, CacheSettings, CacheStats, CacheStore};
use crate::tasks::{run_sweep, spawn_sweep_task};

// == Cache Manager ==
/// Cloneable handle to one isolated response cache.
///
/// Clones share the same store, counters and sweep task.
#[derive(Debug, Clone)]
pub struct CacheManager {
    store: Arc<RwLock<CacheStore>>,
    counters: Arc<CacheCounters>,
    sweeper: Arc<JoinHandle<()>>,
}

impl CacheManager {
    // == Constructor ==
    /// Creates an empty cache and starts its background expiry sweep.
    ///
    /// The sweep stops once `shutdown` observes `true` or its sender is
    /// dropped. Must be called from within a tokio runtime.
    pub fn new(settings: CacheSettings, shutdown: watch::Receiver<bool>) -> Self {
        let store = Arc::new(RwLock::new(CacheStore::new(
            settings.max_entries,
            settings.ttl,
        )));
        let counters = Arc::new(CacheCounters::new());

        let sweeper = spawn_sweep_task(
            store.clone(),
            counters.clone(),
            settings.cleanup_interval,
            shutdown,
        );

        Self {
            store,
            counters,
            sweeper: Arc::new(sweeper),
        }
    }

    // == Get ==
    /// Returns the cached payload for `key`, or `None` if it is absent or
    /// expired.
    pub async fn get(&self, key: &str) -> Option<Bytes> {
        let found = self.store.read().await.get_at(key, Instant::now());

        if found.is_some() {
            self.counters.record_hit();
        } else {
            self.counters.record_miss();
        }
        found
    }

    // == Set ==
    /// Stores `payload` under `key` for one TTL, evicting the oldest
    /// entries first if the cache is full.
    pub async fn set(&self, key: impl Into<String>, payload: impl Into<Bytes>) {
        let evicted = {
            let mut store = self.store.write().await;
            store.insert_at(key.into(), payload.into(), Instant::now())
        };

        if evicted > 0 {
            self.counters.record_evictions(evicted);
        }
    }

    // == Sweep ==
    /// Runs one expiry sweep immediately and returns the number of entries
    /// removed.
    pub async fn sweep_expired(&self) -> usize {
        let removed = run_sweep(&self.store, &self.counters).await;
        debug!("On-demand sweep removed {} entries", removed);
        removed
    }

    // == Length ==
    /// Returns the number of resident entries, including expired ones not
    /// yet swept.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Time To Live ==
    /// Remaining lifetime of `key`, or `None` if it is absent or expired.
    pub async fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.store.read().await.ttl_remaining_at(key, Instant::now())
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        let total_entries = self.len().await;
        self.counters.snapshot(total_entries)
    }

    // == Sweeper State ==
    /// Returns true while the background sweep task is still running.
    pub fn is_sweeping(&self) -> bool {
        !self.sweeper.is_finished()
    }
}
