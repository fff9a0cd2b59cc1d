//! Cache Store Module
//!
//! The unsynchronized map behind the cache manager. Every operation takes
//! the current instant explicitly; locking and clock reads live in
//! [`CacheManager`](crate::cache::CacheManager).

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;
use tracing::info;

use crate::cache::CacheEntry;

// == Cache Store ==
/// Bounded map from cache key to entry with a fixed TTL.
///
/// Expired entries stay resident until a sweep or a capacity eviction
/// removes them, so `len()` may include entries `get_at` already treats as
/// misses. Those entries still count against `max_entries`.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Maximum number of resident entries after any insert
    max_entries: usize,
    /// Lifetime of every inserted entry
    ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// A `max_entries` of zero is treated as one, since an insert always
    /// leaves the new entry resident.
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: max_entries.max(1),
            ttl,
        }
    }

    // == Get ==
    /// Returns the payload for `key` if present and not expired at `now`.
    ///
    /// Never mutates the map; an expired entry is reported as absent and
    /// left for the sweep.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<Bytes> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.payload.clone())
    }

    // == Insert ==
    /// Inserts or overwrites `key`, expiring at `now + ttl`.
    ///
    /// Capacity is enforced before a new key goes in. Returns the number of
    /// entries evicted to make room.
    pub fn insert_at(&mut self, key: String, payload: Bytes, now: Instant) -> usize {
        let evicted = if self.entries.contains_key(&key) {
            0
        } else {
            self.make_room(1)
        };

        self.entries
            .insert(key, CacheEntry::new(payload, now, self.ttl));
        evicted
    }

    // == Enforce Capacity ==
    /// Evicts enough entries that `reserve` more fit under `max_entries`.
    ///
    /// With a uniform TTL, soonest-to-expire is oldest-inserted. Ties on
    /// `expires_at` are broken arbitrarily.
    fn make_room(&mut self, reserve: usize) -> usize {
        let limit = self.max_entries.saturating_sub(reserve);
        if self.entries.len() <= limit {
            return 0;
        }
        let surplus = self.entries.len() - limit;

        let mut by_expiry: Vec<(Instant, &String)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.expires_at, key))
            .collect();
        by_expiry.sort_unstable_by_key(|(expires_at, _)| *expires_at);

        let victims: Vec<String> = by_expiry
            .into_iter()
            .take(surplus)
            .map(|(_, key)| key.clone())
            .collect();

        for key in &victims {
            self.entries.remove(key);
        }

        info!("Evicted {} cache entries over capacity", surplus);
        surplus
    }

    // == Remove Expired ==
    /// Removes every entry expired at `now`.
    ///
    /// Returns the number of entries removed.
    pub fn remove_expired_at(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    // == Expiry Lookup ==
    /// Returns the expiry of `key` regardless of whether it has passed.
    pub fn expires_at(&self, key: &str) -> Option<Instant> {
        self.entries.get(key).map(|entry| entry.expires_at)
    }

    // == Time To Live Lookup ==
    /// Remaining lifetime of `key` at `now`, or `None` if it is absent or
    /// expired.
    pub fn ttl_remaining_at(&self, key: &str, now: Instant) -> Option<Duration> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.ttl_remaining_at(now))
    }

    // == Contains ==
    /// Returns true if `key` is resident, expired or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the number of resident entries, including expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Capacity ==
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    // == TTL ==
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(600);

    fn body(s: &str) -> Bytes {
        Bytes::copy_from_slice(s.as_bytes())
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100, TTL);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_entries(), 100);
        assert_eq!(store.ttl(), TTL);
    }

    #[test]
    fn test_store_zero_capacity_clamped() {
        let mut store = CacheStore::new(0, TTL);
        let now = Instant::now();

        store.insert_at("/a".to_string(), body("a"), now);
        store.insert_at("/b".to_string(), body("b"), now + Duration::from_secs(1));

        assert_eq!(store.max_entries(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.contains_key("/b"));
    }

    #[test]
    fn test_store_insert_and_get() {
        let mut store = CacheStore::new(100, TTL);
        let now = Instant::now();

        let evicted = store.insert_at("/3/movie/550".to_string(), body("fight club"), now);

        assert_eq!(evicted, 0);
        assert_eq!(store.get_at("/3/movie/550", now), Some(body("fight club")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let store = CacheStore::new(100, TTL);
        assert!(store.get_at("/missing", Instant::now()).is_none());
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(100, TTL);
        let now = Instant::now();

        store.insert_at("/k".to_string(), body("v1"), now);
        store.insert_at("/k".to_string(), body("v2"), now + Duration::from_secs(5));

        assert_eq!(store.get_at("/k", now + Duration::from_secs(5)), Some(body("v2")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite_resets_expiry() {
        let mut store = CacheStore::new(100, TTL);
        let now = Instant::now();
        let later = now + Duration::from_secs(300);

        store.insert_at("/k".to_string(), body("v1"), now);
        store.insert_at("/k".to_string(), body("v2"), later);

        assert_eq!(store.expires_at("/k"), Some(later + TTL));
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(100, TTL);
        let now = Instant::now();

        store.insert_at("/k".to_string(), body("v"), now);

        assert!(store.get_at("/k", now + TTL).is_some());
        assert!(store.get_at("/k", now + TTL + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_store_get_leaves_expired_entry_resident() {
        let mut store = CacheStore::new(100, TTL);
        let now = Instant::now();

        store.insert_at("/k".to_string(), body("v"), now);
        let after = now + TTL + Duration::from_secs(1);

        assert!(store.get_at("/k", after).is_none());
        assert!(store.contains_key("/k"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_capacity_eviction_oldest_first() {
        let mut store = CacheStore::new(3, TTL);
        let now = Instant::now();

        for (i, key) in ["/1", "/2", "/3"].iter().enumerate() {
            store.insert_at(key.to_string(), body(key), now + Duration::from_secs(i as u64));
        }

        let evicted = store.insert_at("/4".to_string(), body("/4"), now + Duration::from_secs(3));

        assert_eq!(evicted, 1);
        assert_eq!(store.len(), 3);
        assert!(!store.contains_key("/1"));
        assert!(store.contains_key("/2"));
        assert!(store.contains_key("/3"));
        assert!(store.contains_key("/4"));
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let mut store = CacheStore::new(2, TTL);
        let now = Instant::now();

        store.insert_at("/1".to_string(), body("a"), now);
        store.insert_at("/2".to_string(), body("b"), now + Duration::from_secs(1));
        let evicted = store.insert_at("/1".to_string(), body("c"), now + Duration::from_secs(2));

        assert_eq!(evicted, 0);
        assert_eq!(store.len(), 2);
        assert!(store.contains_key("/2"));
    }

    #[test]
    fn test_store_eviction_prefers_expired_entries() {
        let mut store = CacheStore::new(2, TTL);
        let now = Instant::now();

        store.insert_at("/old".to_string(), body("a"), now);
        let later = now + TTL + Duration::from_secs(10);
        store.insert_at("/fresh".to_string(), body("b"), later);
        store.insert_at("/newest".to_string(), body("c"), later + Duration::from_secs(1));

        assert!(!store.contains_key("/old"));
        assert!(store.get_at("/fresh", later).is_some());
        assert!(store.get_at("/newest", later).is_some());
    }

    #[test]
    fn test_store_make_room_noop_under_limit() {
        let mut store = CacheStore::new(10, TTL);
        let now = Instant::now();

        store.insert_at("/a".to_string(), body("a"), now);
        assert_eq!(store.make_room(0), 0);
        assert_eq!(store.make_room(1), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_remaining() {
        let mut store = CacheStore::new(10, TTL);
        let now = Instant::now();

        store.insert_at("/k".to_string(), body("v"), now);

        assert_eq!(store.ttl_remaining_at("/k", now), Some(TTL));
        assert_eq!(
            store.ttl_remaining_at("/k", now + Duration::from_secs(100)),
            Some(Duration::from_secs(500))
        );
        // Live with nothing left at exactly expires_at, gone one tick later
        assert_eq!(store.ttl_remaining_at("/k", now + TTL), Some(Duration::ZERO));
        assert!(store
            .ttl_remaining_at("/k", now + TTL + Duration::from_nanos(1))
            .is_none());
        assert!(store.ttl_remaining_at("/missing", now).is_none());
    }

    #[test]
    fn test_store_remove_expired() {
        let mut store = CacheStore::new(100, TTL);
        let now = Instant::now();
        let later = now + Duration::from_secs(400);

        store.insert_at("/expired".to_string(), body("a"), now);
        store.insert_at("/live".to_string(), body("b"), later);

        let sweep_at = now + TTL + Duration::from_secs(1);
        let removed = store.remove_expired_at(sweep_at);

        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_at("/live", sweep_at), Some(body("b")));
        assert_eq!(store.expires_at("/live"), Some(later + TTL));
    }

    #[test]
    fn test_store_remove_expired_nothing_expired() {
        let mut store = CacheStore::new(100, TTL);
        let now = Instant::now();

        store.insert_at("/a".to_string(), body("a"), now);
        assert_eq!(store.remove_expired_at(now + TTL), 0);
        assert_eq!(store.len(), 1);
    }
}
