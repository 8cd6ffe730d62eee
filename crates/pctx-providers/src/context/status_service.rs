//! Status Service Context Provider
//!
//! Talks to a REST status service:
//!
//! | Endpoint | Response |
//! |----------|----------|
//! | `GET /status` | `{ platform: { blockHeight, blockTime, coreChainLockedHeight, version, timePerBlock } }` or the same fields flat |
//! | `GET /proposers/{id}/blocks/count` | `{ count }` |
//! | `GET /blocks/{height}/proposer` | `{ proposer }` |
//! | `GET /quorums` | `{ [quorumHash]: { publicKey, version, type } }` |
//!
//! The proposer and quorum endpoints are optional on the backend side: when
//! they are missing or fail, the provider answers `None`. A reachable
//! endpoint that returns malformed data is always an error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use pctx_domain::constants::{
    DEFAULT_CACHE_CAPACITY, PLATFORM_STATE_CACHE_TTL_MS, QUORUM_KEYS_CACHE_TTL_MS,
};
use pctx_domain::error::{Error, Result};
use pctx_domain::ports::{ContextProvider, ExtendedContextProvider};
use pctx_domain::value_objects::{
    Capability, CapabilitySet, ContextOperation, PlatformStatus, QuorumMap,
};

use crate::cache::JsonCache;
use crate::constants::{
    QUORUMS_PATH, STATUS_PATH, STATUS_SERVICE_PROVIDER_NAME, STATUS_SERVICE_TIMEOUT_MS,
};
use crate::context::status::{
    StatusCache, as_count, as_proposer, optional_field, parse_platform_status,
};
use crate::http::{HttpClientConfig, HttpResponseUtils, build_client};
use crate::retry::RetryPolicy;

/// Status service provider settings
#[derive(Debug, Clone)]
pub struct StatusServiceConfig {
    /// Service base URL, without trailing path
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Freshness window for platform-state and proposer values
    pub cache_ttl: Duration,
    /// Freshness window for quorum keys
    pub quorum_cache_ttl: Duration,
    /// Maximum cached entries
    pub cache_capacity: usize,
    /// Retry policy for transient failures
    pub retry: RetryPolicy,
}

impl StatusServiceConfig {
    /// Defaults for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_millis(STATUS_SERVICE_TIMEOUT_MS),
            cache_ttl: Duration::from_millis(PLATFORM_STATE_CACHE_TTL_MS),
            quorum_cache_ttl: Duration::from_millis(QUORUM_KEYS_CACHE_TTL_MS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            retry: RetryPolicy::default(),
        }
    }
}

/// Context provider backed by a REST status service
pub struct StatusServiceContextProvider {
    config: StatusServiceConfig,
    client: Client,
    status: StatusCache,
    aux: JsonCache,
    quorums: JsonCache,
}

impl StatusServiceContextProvider {
    /// Create a provider with its own pooled HTTP client
    pub fn new(config: StatusServiceConfig) -> Result<Self> {
        let client = build_client(&HttpClientConfig::with_timeout(config.timeout))?;
        Ok(Self::with_client(config, client))
    }

    /// Create a provider sharing an existing HTTP client
    pub fn with_client(config: StatusServiceConfig, client: Client) -> Self {
        Self {
            status: StatusCache::new(config.cache_ttl, config.cache_capacity),
            aux: JsonCache::new(config.cache_ttl, config.cache_capacity),
            quorums: JsonCache::new(config.quorum_cache_ttl, 1),
            config,
            client,
        }
    }

    /// Base URL this provider talks to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Drop every cached value
    pub fn clear_cache(&self) {
        self.status.clear();
        self.aux.clear();
        self.quorums.clear();
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        self.config
            .retry
            .execute(path, || {
                HttpResponseUtils::get_json(
                    &self.client,
                    &url,
                    self.config.timeout,
                    STATUS_SERVICE_PROVIDER_NAME,
                )
            })
            .await
    }

    /// Fetch the aggregate status, bypassing the cache
    pub async fn fetch_status(&self) -> Result<PlatformStatus> {
        let body = self.get(STATUS_PATH).await?;
        parse_platform_status(&body)
    }

    async fn cached_status<T: serde::de::DeserializeOwned>(
        &self,
        operation: ContextOperation,
    ) -> Result<T> {
        self.status
            .get_or_fetch(operation, || self.fetch_status())
            .await
    }

    /// GET an optional endpoint
    ///
    /// A failed request means "not offered". A reachable endpoint answering
    /// with malformed data is an error.
    async fn get_optional(&self, path: &str) -> Result<Option<Value>> {
        match self.get(path).await {
            Ok(Value::Null) => Ok(None),
            Ok(body) => Ok(Some(body)),
            Err(e @ (Error::InvalidResponse { .. } | Error::Json { .. })) => Err(e),
            Err(e) => {
                debug!(path, error = %e, "optional status endpoint unavailable");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl ContextProvider for StatusServiceContextProvider {
    async fn get_latest_platform_block_height(&self) -> Result<u64> {
        self.cached_status(ContextOperation::LatestPlatformBlockHeight)
            .await
    }

    async fn get_latest_platform_block_time(&self) -> Result<u64> {
        self.cached_status(ContextOperation::LatestPlatformBlockTime)
            .await
    }

    async fn get_latest_platform_core_chain_locked_height(&self) -> Result<u32> {
        self.cached_status(ContextOperation::LatestPlatformCoreChainLockedHeight)
            .await
    }

    async fn get_latest_platform_version(&self) -> Result<String> {
        self.cached_status(ContextOperation::LatestPlatformVersion)
            .await
    }

    async fn get_proposer_block_count(&self, proposer_id: &str) -> Result<Option<u64>> {
        let key = ContextOperation::ProposerBlockCount.cache_key(Some(proposer_id));
        if let Some(count) = self.aux.get_as::<u64>(&key) {
            return Ok(Some(count));
        }

        let body = self
            .get_optional(&format!("/proposers/{proposer_id}/blocks/count"))
            .await?;
        let count = optional_field(body.as_ref(), "count", as_count)?;
        if let Some(count) = count {
            self.aux.set_as(key, &count)?;
        }
        Ok(count)
    }

    async fn get_time_per_block_millis(&self) -> Result<u64> {
        self.cached_status(ContextOperation::TimePerBlockMillis)
            .await
    }

    async fn get_block_proposer(&self, height: u64) -> Result<Option<String>> {
        let key = ContextOperation::BlockProposer.cache_key(Some(&height.to_string()));
        if let Some(proposer) = self.aux.get_as::<String>(&key) {
            return Ok(Some(proposer));
        }

        let body = self
            .get_optional(&format!("/blocks/{height}/proposer"))
            .await?;
        let proposer = optional_field(body.as_ref(), "proposer", as_proposer)?;
        if let Some(proposer) = &proposer {
            self.aux.set_as(key, proposer)?;
        }
        Ok(proposer)
    }

    async fn get_quorum_keys(&self) -> Result<Option<QuorumMap>> {
        let key = ContextOperation::QuorumKeys.cache_key(None);
        if let Some(quorums) = self.quorums.get_as::<QuorumMap>(&key) {
            return Ok(Some(quorums));
        }

        let Some(body) = self.get_optional(QUORUMS_PATH).await? else {
            return Ok(None);
        };
        let quorums: QuorumMap = serde_json::from_value(body)
            .map_err(|e| Error::invalid_response(format!("malformed quorum map: {e}")))?;
        self.quorums.set_as(key, &quorums)?;
        Ok(Some(quorums))
    }

    async fn is_valid(&self) -> bool {
        self.get_latest_platform_block_height().await.is_ok()
    }

    fn as_extended(&self) -> Option<&dyn ExtendedContextProvider> {
        Some(self)
    }
}

#[async_trait]
impl ExtendedContextProvider for StatusServiceContextProvider {
    fn provider_name(&self) -> &str {
        STATUS_SERVICE_PROVIDER_NAME
    }

    fn capabilities(&self) -> CapabilitySet {
        [
            Capability::PlatformState,
            Capability::BlockProposer,
            Capability::QuorumKeys,
        ]
        .into_iter()
        .collect()
    }

    async fn is_available(&self) -> bool {
        self.check_availability().await.is_ok()
    }

    async fn check_availability(&self) -> Result<()> {
        self.get_latest_platform_block_height().await.map(|_| ())
    }
}
