use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use pctx_domain::error::Result;

use super::ttl_lru::{CacheStats, TtlLruCache};

/// Cache storing heterogeneous results as JSON values
///
/// Used where one cache holds results of different operations, such as the
/// cross-provider cache of a priority provider.
#[derive(Debug)]
pub struct JsonCache {
    inner: TtlLruCache<serde_json::Value>,
}

impl JsonCache {
    /// Create a JSON cache with the given freshness window and capacity
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            inner: TtlLruCache::new(ttl, capacity),
        }
    }

    /// Fetch and deserialize a fresh value
    ///
    /// A value that no longer deserializes into `T` is dropped and reported
    /// as a miss.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.inner.get(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                debug!(key, error = %e, "discarding cache entry of unexpected shape");
                self.inner.remove(key);
                None
            }
        }
    }

    /// Serialize and store a value
    pub fn set_as<T: Serialize>(&self, key: impl Into<String>, value: &T) -> Result<()> {
        let json = serde_json::to_value(value)?;
        self.inner.set(key, json);
        Ok(())
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Snapshot of the cache counters
    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }
}
