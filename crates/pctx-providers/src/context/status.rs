//! Platform Status Parsing and Caching
//!
//! A status backend answers one aggregate request with all five
//! platform-state values. [`StatusCache`] stores them under five separate
//! keys so that any later getter within the freshness window is served
//! without another round trip.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::debug;

use pctx_domain::error::{Error, Result};
use pctx_domain::value_objects::{ContextOperation, PlatformStatus, StatusSource};

use crate::cache::{CacheStats, JsonCache};
use crate::utils::JsonExt;

/// Operations answered by one status round trip
pub const STATUS_OPERATIONS: [ContextOperation; 5] = [
    ContextOperation::LatestPlatformBlockHeight,
    ContextOperation::LatestPlatformBlockTime,
    ContextOperation::LatestPlatformCoreChainLockedHeight,
    ContextOperation::LatestPlatformVersion,
    ContextOperation::TimePerBlockMillis,
];

/// Parse a status payload
///
/// Accepts both `{ "platform": { ... } }` and the same fields at top level.
/// Numeric fields may be JSON numbers or numeric strings. Any missing or
/// unparseable field is an `Error::InvalidResponse`.
pub fn parse_platform_status(value: &Value) -> Result<PlatformStatus> {
    let body = match value.get("platform") {
        Some(inner) if inner.is_object() => inner,
        _ => value,
    };
    if !body.is_object() {
        return Err(Error::invalid_response("status payload is not an object"));
    }

    let field = |name: &str| {
        body.lenient_u64(name)
            .ok_or_else(|| Error::invalid_response(format!("status field `{name}` missing or not a number")))
    };

    let core_height = field("coreChainLockedHeight")?;
    Ok(PlatformStatus {
        block_height: field("blockHeight")?,
        block_time: field("blockTime")?,
        core_chain_locked_height: u32::try_from(core_height).map_err(|_| {
            Error::invalid_response(format!("coreChainLockedHeight {core_height} out of range"))
        })?,
        version: body
            .lenient_string("version")
            .ok_or_else(|| Error::invalid_response("status field `version` missing"))?,
        time_per_block: field("timePerBlock")?,
        source: StatusSource::Live,
    })
}

fn status_field(status: &PlatformStatus, operation: ContextOperation) -> Result<Value> {
    match operation {
        ContextOperation::LatestPlatformBlockHeight => Ok(json!(status.block_height)),
        ContextOperation::LatestPlatformBlockTime => Ok(json!(status.block_time)),
        ContextOperation::LatestPlatformCoreChainLockedHeight => {
            Ok(json!(status.core_chain_locked_height))
        }
        ContextOperation::LatestPlatformVersion => Ok(json!(status.version)),
        ContextOperation::TimePerBlockMillis => Ok(json!(status.time_per_block)),
        other => Err(Error::internal(format!(
            "{other} is not answered by a status request"
        ))),
    }
}

/// Five-key status cache with refresh coalescing
///
/// Concurrent cold reads wait for a single refresh instead of issuing one
/// request each.
#[derive(Debug)]
pub struct StatusCache {
    cache: JsonCache,
    refresh: Mutex<()>,
}

impl StatusCache {
    /// Create a status cache
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            cache: JsonCache::new(ttl, capacity.max(STATUS_OPERATIONS.len())),
            refresh: Mutex::new(()),
        }
    }

    /// Store every field of `status`
    pub fn store(&self, status: &PlatformStatus) -> Result<()> {
        for operation in STATUS_OPERATIONS {
            let value = status_field(status, operation)?;
            self.cache.set_as(operation.cache_key(None), &value)?;
        }
        Ok(())
    }

    /// Return the cached value for `operation`, or fetch a fresh status
    pub async fn get_or_fetch<T, F, Fut>(&self, operation: ContextOperation, fetch: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<PlatformStatus>>,
    {
        let key = operation.cache_key(None);
        if let Some(hit) = self.cache.get_as::<T>(&key) {
            debug!(%operation, "status cache hit");
            return Ok(hit);
        }

        let _guard = self.refresh.lock().await;
        if let Some(hit) = self.cache.get_as::<T>(&key) {
            return Ok(hit);
        }

        debug!(%operation, "status cache miss, fetching");
        let status = fetch().await?;
        self.store(&status)?;
        Ok(serde_json::from_value(status_field(&status, operation)?)?)
    }

    /// Drop every cached value
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Cache counters
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

/// Read an optional field of an auxiliary response
///
/// `null` or an absent body means "not available". A present value of the
/// wrong type is an error.
pub(crate) fn optional_field<T>(
    body: Option<&Value>,
    field: &str,
    convert: impl FnOnce(&Value) -> Option<T>,
) -> Result<Option<T>> {
    let Some(body) = body else {
        return Ok(None);
    };
    match body.get(field) {
        None | Some(Value::Null) => {
            if body.is_object() {
                Ok(None)
            } else {
                Err(Error::invalid_response(format!(
                    "expected an object with `{field}`"
                )))
            }
        }
        Some(value) => convert(value).map(Some).ok_or_else(|| {
            Error::invalid_response(format!("field `{field}` has unexpected type: {value}"))
        }),
    }
}

pub(crate) fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

pub(crate) fn as_proposer(value: &Value) -> Option<String> {
    value.as_str().map(ToString::to_string)
}
