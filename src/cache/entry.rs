//! Cache Entry Module
//!
//! Defines a single cached upstream response with its fixed expiry.

use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

// == Cache Entry ==
/// A cached response body and the instant it stops being served.
///
/// Entries are never mutated after creation; an overwrite replaces the
/// whole entry, which also resets its expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The upstream response body
    pub payload: Bytes,
    /// Insertion instant plus the store's TTL
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry inserted at `now` that lives for `ttl`.
    pub fn new(payload: Bytes, now: Instant, ttl: Duration) -> Self {
        Self {
            payload,
            expires_at: now + ttl,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is expired at `now`.
    ///
    /// Boundary condition: an entry is still live at exactly `expires_at`
    /// and only expires once `now` is strictly after it.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime at `now`, saturating at zero.
    pub fn ttl_remaining_at(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}
