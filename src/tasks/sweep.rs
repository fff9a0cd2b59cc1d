//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries until
//! told to stop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::{CacheCounters, CacheStore};

/// Shortest interval the sweep will run at.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(10);

/// Runs one sweep pass under the write lock and returns the number of
/// entries removed.
pub async fn run_sweep(store: &RwLock<CacheStore>, counters: &CacheCounters) -> usize {
    let removed = {
        let mut guard = store.write().await;
        guard.remove_expired_at(Instant::now())
    };

    counters.record_expired(removed);
    removed
}

/// Spawns the background task that sweeps expired entries every `interval`.
///
/// The loop ends when `shutdown` becomes `true` or its sender is dropped.
///
/// # Returns
/// A JoinHandle for the spawned task; it finishes after shutdown.
pub fn spawn_sweep_task(
    store: Arc<RwLock<CacheStore>>,
    counters: Arc<CacheCounters>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let interval = interval.max(MIN_SWEEP_INTERVAL);

    tokio::spawn(async move {
        if *shutdown.borrow_and_update() {
            debug!("Expiry sweep not started, shutdown already requested");
            return;
        }

        info!("Starting expiry sweep task with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Expiry sweep task shutting down");
                        break;
                    }
                    continue;
                }
            }

            let removed = run_sweep(&store, &counters).await;
            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
