//! Fixed Node List Context Provider
//!
//! Asks a fixed pool of node addresses for their status, starting at a
//! random offset and rotating through the pool on every refresh. The first
//! node that answers wins.
//!
//! When no node answers, the getters fail with `Error::Degraded`. Placeholder
//! data is only produced by [`NodeListContextProvider::platform_status`] when
//! `allow_synthesized` is set, and it is always tagged
//! [`StatusSource::Synthesized`].

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use tracing::{debug, warn};

use pctx_domain::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_TIME_PER_BLOCK_MS, PLATFORM_STATE_CACHE_TTL_MS,
    SYNTHESIZED_PLATFORM_VERSION,
};
use pctx_domain::error::{Error, Result};
use pctx_domain::ports::{ContextProvider, ExtendedContextProvider};
use pctx_domain::value_objects::{
    Capability, CapabilitySet, ContextOperation, Network, PlatformStatus, StatusSource,
};

use crate::constants::{
    DEFAULT_NODE_SCHEME, NODE_LIST_PROVIDER_NAME, NODE_STATUS_TIMEOUT_MS, STATUS_PATH,
};
use crate::context::status::{StatusCache, parse_platform_status};
use crate::discovery::NodeDiscovery;
use crate::http::{HttpClientConfig, HttpResponseUtils, build_client};
use crate::retry::RetryPolicy;

/// Fetches the status of a single node
#[async_trait]
pub trait NodeStatusClient: Send + Sync {
    /// Status reported by the node at `address` (`host:port`)
    async fn fetch_status(&self, address: &str) -> Result<PlatformStatus>;
}

/// [`NodeStatusClient`] issuing `GET {scheme}://{address}/status`
pub struct HttpNodeStatusClient {
    client: Client,
    scheme: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpNodeStatusClient {
    /// Create a client with its own connection pool
    pub fn new(scheme: impl Into<String>, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let client = build_client(&HttpClientConfig::with_timeout(timeout))?;
        Ok(Self::with_client(client, scheme, timeout, retry))
    }

    /// Create a client sharing an existing connection pool
    pub fn with_client(
        client: Client,
        scheme: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            scheme: scheme.into(),
            timeout,
            retry,
        }
    }
}

#[async_trait]
impl NodeStatusClient for HttpNodeStatusClient {
    async fn fetch_status(&self, address: &str) -> Result<PlatformStatus> {
        let url = format!("{}://{address}{STATUS_PATH}", self.scheme);
        let body = self
            .retry
            .execute(address, || {
                HttpResponseUtils::get_json(&self.client, &url, self.timeout, address)
            })
            .await?;
        parse_platform_status(&body)
    }
}

/// Node list provider settings
#[derive(Debug, Clone)]
pub struct NodeListConfig {
    /// Node addresses (`host:port`)
    pub nodes: Vec<String>,
    /// Network the nodes belong to
    pub network: Network,
    /// URL scheme used to reach the nodes
    pub scheme: String,
    /// Per-node request timeout
    pub timeout: Duration,
    /// Freshness window for status values
    pub cache_ttl: Duration,
    /// Maximum cached entries
    pub cache_capacity: usize,
    /// Whether `platform_status` may return placeholder data
    pub allow_synthesized: bool,
    /// Retry policy applied per node
    pub retry: RetryPolicy,
}

impl NodeListConfig {
    /// Defaults for the given node list
    pub fn new(network: Network, nodes: Vec<String>) -> Self {
        Self {
            nodes,
            network,
            scheme: DEFAULT_NODE_SCHEME.to_string(),
            timeout: Duration::from_millis(NODE_STATUS_TIMEOUT_MS),
            cache_ttl: Duration::from_millis(PLATFORM_STATE_CACHE_TTL_MS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            allow_synthesized: false,
            retry: RetryPolicy::no_retry(),
        }
    }
}

/// Context provider over a fixed pool of nodes
pub struct NodeListContextProvider {
    nodes: Vec<String>,
    network: Network,
    allow_synthesized: bool,
    next: AtomicUsize,
    client: Arc<dyn NodeStatusClient>,
    status: StatusCache,
}

impl NodeListContextProvider {
    /// Create a provider reaching nodes over HTTP
    pub fn new(config: NodeListConfig) -> Result<Self> {
        let client = HttpNodeStatusClient::new(
            config.scheme.clone(),
            config.timeout,
            config.retry.clone(),
        )?;
        Self::with_status_client(config, Arc::new(client))
    }

    /// Create a provider with a custom node status client
    pub fn with_status_client(
        config: NodeListConfig,
        client: Arc<dyn NodeStatusClient>,
    ) -> Result<Self> {
        if config.nodes.is_empty() {
            return Err(Error::invalid_argument("node list must not be empty"));
        }
        let start = rand::rng().random_range(0..config.nodes.len());
        Ok(Self {
            status: StatusCache::new(config.cache_ttl, config.cache_capacity),
            next: AtomicUsize::new(start),
            nodes: config.nodes,
            network: config.network,
            allow_synthesized: config.allow_synthesized,
            client,
        })
    }

    /// Build the node list from a discovery result for `config.network`
    ///
    /// Any nodes already in `config` are replaced.
    pub async fn from_discovery(discovery: &NodeDiscovery, mut config: NodeListConfig) -> Result<Self> {
        config.nodes = discovery.discover(config.network).await;
        Self::new(config)
    }

    /// Node addresses in pool order
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Ask nodes in rotation until one answers
    async fn fetch_live_status(&self) -> Result<PlatformStatus> {
        let len = self.nodes.len();
        let start = self.next.fetch_add(1, Ordering::Relaxed) % len;

        let mut failures = Vec::with_capacity(len);
        for offset in 0..len {
            let address = &self.nodes[(start + offset) % len];
            match self.client.fetch_status(address).await {
                Ok(status) => {
                    debug!(node = %address, "node answered status request");
                    return Ok(status);
                }
                Err(e) => {
                    debug!(node = %address, error = %e, "node status request failed");
                    failures.push(format!("{address}: {e}"));
                }
            }
        }

        warn!(
            nodes = len,
            failures = %failures.join("; "),
            "no node in the list answered"
        );
        Err(Error::degraded(NODE_LIST_PROVIDER_NAME))
    }

    async fn cached_status<T: serde::de::DeserializeOwned>(
        &self,
        operation: ContextOperation,
    ) -> Result<T> {
        self.status
            .get_or_fetch(operation, || self.fetch_live_status())
            .await
    }

    /// Aggregate status, falling back to placeholder data when allowed
    ///
    /// Live data is cached like the individual getters. Synthesized data is
    /// never cached and never returned by the `ContextProvider` getters.
    pub async fn platform_status(&self) -> Result<PlatformStatus> {
        match self.fetch_live_status().await {
            Ok(status) => {
                self.status.store(&status)?;
                Ok(status)
            }
            Err(Error::Degraded { .. }) if self.allow_synthesized => {
                warn!(network = %self.network, "returning synthesized platform status");
                Ok(self.synthesized_status())
            }
            Err(e) => Err(e),
        }
    }

    fn synthesized_status(&self) -> PlatformStatus {
        let now_ms = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();
        PlatformStatus {
            block_height: 0,
            block_time: now_ms,
            core_chain_locked_height: self.network.platform_activation_height(),
            version: SYNTHESIZED_PLATFORM_VERSION.to_string(),
            time_per_block: DEFAULT_TIME_PER_BLOCK_MS,
            source: StatusSource::Synthesized,
        }
    }
}

#[async_trait]
impl ContextProvider for NodeListContextProvider {
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

    async fn get_proposer_block_count(&self, _proposer_id: &str) -> Result<Option<u64>> {
        Ok(None)
    }

    async fn get_time_per_block_millis(&self) -> Result<u64> {
        self.cached_status(ContextOperation::TimePerBlockMillis)
            .await
    }

    async fn get_block_proposer(&self, _height: u64) -> Result<Option<String>> {
        Ok(None)
    }

    async fn is_valid(&self) -> bool {
        self.get_latest_platform_block_height().await.is_ok()
    }

    fn as_extended(&self) -> Option<&dyn ExtendedContextProvider> {
        Some(self)
    }
}

#[async_trait]
impl ExtendedContextProvider for NodeListContextProvider {
    fn provider_name(&self) -> &str {
        NODE_LIST_PROVIDER_NAME
    }

    fn capabilities(&self) -> CapabilitySet {
        [Capability::PlatformState].into_iter().collect()
    }

    async fn is_available(&self) -> bool {
        self.check_availability().await.is_ok()
    }

    async fn check_availability(&self) -> Result<()> {
        self.get_latest_platform_block_height().await.map(|_| ())
    }
}
