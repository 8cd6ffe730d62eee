//! Cache Layer
//!
//! Per-provider memoization with a freshness window and LRU capacity
//! eviction. Every provider owns its own instance; instances are never shared
//! between providers.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TtlLruCache`] | Generic time-expiring LRU map |
//! | [`JsonCache`] | `TtlLruCache` over JSON values with typed accessors |
//! | [`CacheStats`] | Hit/miss/eviction counters |

mod json;
mod ttl_lru;

pub use json::JsonCache;
pub use ttl_lru::{CacheStats, TtlLruCache};
