//! TTL + LRU Cache
//!
//! A string-keyed map whose entries expire after a fixed freshness window and
//! whose size is capped by least-recently-used eviction. Expired entries are
//! dropped lazily on read.

use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;
use tracing::debug;

use pctx_domain::constants::{DEFAULT_CACHE_CAPACITY, PLATFORM_STATE_CACHE_TTL_MS};

/// Cached value together with the moment it was stored
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

#[derive(Debug)]
struct CacheState<V> {
    entries: LruCache<String, CacheEntry<V>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads that returned a fresh value
    pub hits: u64,
    /// Reads that found nothing or an expired value
    pub misses: u64,
    /// Entries dropped to make room for new keys
    pub evictions: u64,
    /// Entries currently held, fresh or not
    pub entries: usize,
    /// Maximum number of entries
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of reads that were hits
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Key-value store with a freshness window and LRU eviction
///
/// - `get` returns a value only while `now - inserted_at < ttl`, and moves a
///   hit to the most-recently-used position. Expired entries are removed on
///   read.
/// - `set` never fails. Inserting a new key into a full cache evicts exactly
///   one entry, the least recently used.
///
/// Reads and writes are synchronous and never suspend.
#[derive(Debug)]
pub struct TtlLruCache<V> {
    state: Mutex<CacheState<V>>,
    ttl: Duration,
    capacity: NonZeroUsize,
}

impl<V: Clone> TtlLruCache<V> {
    /// Create a cache with the given freshness window and capacity
    ///
    /// A capacity of zero is treated as one.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
            ttl,
            capacity,
        }
    }

    /// Create a cache with the default platform-state window and capacity
    pub fn with_defaults() -> Self {
        Self::new(
            Duration::from_millis(PLATFORM_STATE_CACHE_TTL_MS),
            DEFAULT_CACHE_CAPACITY,
        )
    }

    /// Freshness window
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the value for `key` if it is still fresh
    pub fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = &mut *guard;

        let expired = match state.entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                state.hits += 1;
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            state.entries.pop(key);
            debug!(key, "cache entry expired");
        }
        state.misses += 1;
        None
    }

    /// Store `value` under `key`, stamping it with the current time
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = &mut *guard;

        let entry = CacheEntry {
            value,
            inserted_at: Instant::now(),
        };
        if let Some((evicted, _)) = state.entries.push(key.clone(), entry) {
            if evicted != key {
                state.evictions += 1;
                debug!(key = %evicted, "cache entry evicted");
            }
        }
    }

    /// Remove a single key
    pub fn remove(&self, key: &str) -> Option<V> {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        guard.entries.pop(key).map(|entry| entry.value)
    }

    /// Remove every entry
    pub fn clear(&self) {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        guard.entries.clear();
    }

    /// Number of entries currently held, including expired ones not yet read
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the cache counters
    pub fn stats(&self) -> CacheStats {
        let guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        CacheStats {
            hits: guard.hits,
            misses: guard.misses,
            evictions: guard.evictions,
            entries: guard.entries.len(),
            capacity: self.capacity.get(),
        }
    }
}

impl<V: Clone> Default for TtlLruCache<V> {
    fn default() -> Self {
        Self::with_defaults()
    }
}
