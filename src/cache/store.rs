//! In-memory response store.
//!
//! A sharded concurrent map from [`CacheKey`] to shared, immutable values.
//! Expired entries are hidden from readers immediately and physically
//! removed by [`CacheStore::purge_expired`], which the sweeper calls on a
//! fixed interval.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::cache::key::CacheKey;
use crate::observability::metrics;

/// How long an inserted entry stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Kept until removed or the process exits.
    Never,
    /// Uses the store's default TTL.
    Default,
    /// Expires after the given duration.
    After(Duration),
}

impl From<Option<Duration>> for Expiration {
    fn from(ttl: Option<Duration>) -> Self {
        ttl.map_or(Expiration::Never, Expiration::After)
    }
}

struct Entry<V> {
    value: Arc<V>,
    inserted_at: Instant,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Thread-safe cache keyed by [`CacheKey`].
pub struct CacheStore<V> {
    entries: DashMap<CacheKey, Entry<V>>,
    default_ttl: Duration,
}

impl<V> CacheStore<V> {
    /// Create an empty store. `default_ttl` applies to [`Expiration::Default`] inserts.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
        }
    }

    /// Look up a live entry.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<V>> {
        let entry = self.entries.get(key)?;
        if entry.is_expired(Instant::now()) {
            return None;
        }
        Some(Arc::clone(&entry.value))
    }

    /// Insert or replace the entry for `key`.
    pub fn put(&self, key: CacheKey, value: V, expiration: Expiration) {
        self.put_shared(key, Arc::new(value), expiration);
    }

    /// Insert an already shared value.
    pub fn put_shared(&self, key: CacheKey, value: Arc<V>, expiration: Expiration) {
        let now = Instant::now();
        // A deadline past the clock's range never arrives.
        let expires_at = match expiration {
            Expiration::Never => None,
            Expiration::Default => now.checked_add(self.default_ttl),
            Expiration::After(ttl) => now.checked_add(ttl),
        };
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
                expires_at,
            },
        );
        metrics::record_cache_size(self.entries.len());
    }

    pub fn remove(&self, key: &CacheKey) -> Option<Arc<V>> {
        let removed = self.entries.remove(key).map(|(_, entry)| entry.value);
        metrics::record_cache_size(self.entries.len());
        removed
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.get(key).is_some()
    }

    /// Time since the live entry for `key` was inserted.
    pub fn age(&self, key: &CacheKey) -> Option<Duration> {
        let entry = self.entries.get(key)?;
        let now = Instant::now();
        if entry.is_expired(now) {
            return None;
        }
        Some(now.saturating_duration_since(entry.inserted_at))
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
        metrics::record_cache_size(0);
    }

    /// Drop every entry whose TTL has elapsed. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let expired = entry.is_expired(now);
            if expired {
                removed += 1;
            }
            !expired
        });
        metrics::record_cache_size(self.entries.len());
        removed
    }
}
