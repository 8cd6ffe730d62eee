//! Cached Node Discovery

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Client;
use tracing::{debug, info, warn};

use pctx_domain::constants::DISCOVERY_CACHE_TTL_SECS;
use pctx_domain::error::{Error, Result};
use pctx_domain::value_objects::Network;

use crate::constants::{
    DISCOVERY_TIMEOUT_MS, LOCAL_FALLBACK_NODES, MAINNET_FALLBACK_NODES, MAINNET_REGISTRY_URL,
    TESTNET_FALLBACK_NODES, TESTNET_REGISTRY_URL,
};
use crate::discovery::registry::parse_registry_response;
use crate::http::{HttpClientConfig, HttpResponseUtils, build_client};

/// Discovery settings
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Registry endpoint per network; networks without one use the fallback
    pub registry_urls: BTreeMap<Network, String>,
    /// Static node list per network
    pub fallback_nodes: BTreeMap<Network, Vec<String>>,
    /// How long a successful discovery stays fresh
    pub cache_ttl: Duration,
    /// Registry request timeout
    pub timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        let owned = |nodes: &[&str]| nodes.iter().map(ToString::to_string).collect::<Vec<_>>();
        Self {
            registry_urls: BTreeMap::from([
                (Network::Mainnet, MAINNET_REGISTRY_URL.to_string()),
                (Network::Testnet, TESTNET_REGISTRY_URL.to_string()),
            ]),
            fallback_nodes: BTreeMap::from([
                (Network::Mainnet, owned(MAINNET_FALLBACK_NODES)),
                (Network::Testnet, owned(TESTNET_FALLBACK_NODES)),
                (Network::Local, owned(LOCAL_FALLBACK_NODES)),
            ]),
            cache_ttl: Duration::from_secs(DISCOVERY_CACHE_TTL_SECS),
            timeout: Duration::from_millis(DISCOVERY_TIMEOUT_MS),
        }
    }
}

/// Node discovery with a per-network cache and static fallback
///
/// Only registry results are cached; a fallback answer is returned without
/// caching so the next call tries the registry again.
pub struct NodeDiscovery {
    client: Client,
    config: DiscoveryConfig,
    cache: Cache<Network, Arc<Vec<String>>>,
}

impl NodeDiscovery {
    /// Create a discovery instance with its own HTTP client
    pub fn new(config: DiscoveryConfig) -> Result<Self> {
        let client = build_client(&HttpClientConfig::with_timeout(config.timeout))?;
        Ok(Self::with_client(config, client))
    }

    /// Create a discovery instance sharing an HTTP client
    pub fn with_client(config: DiscoveryConfig, client: Client) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(config.cache_ttl)
            .build();
        Self {
            client,
            config,
            cache,
        }
    }

    /// Reachable node addresses for `network`
    ///
    /// Never fails: when the registry errors, times out, returns malformed
    /// data or yields no usable node, the static fallback list is returned.
    pub async fn discover(&self, network: Network) -> Vec<String> {
        if let Some(cached) = self.cache.get(&network).await {
            debug!(%network, nodes = cached.len(), "discovery cache hit");
            return cached.as_ref().clone();
        }

        match self.fetch(network).await {
            Ok(nodes) if !nodes.is_empty() => {
                info!(%network, nodes = nodes.len(), "discovered platform nodes");
                self.cache.insert(network, Arc::new(nodes.clone())).await;
                nodes
            }
            Ok(_) => {
                warn!(%network, "registry returned no usable nodes, using fallback list");
                self.fallback(network)
            }
            Err(e) => {
                warn!(%network, error = %e, "node discovery failed, using fallback list");
                self.fallback(network)
            }
        }
    }

    /// Query the registry for `network` without cache or fallback
    pub async fn fetch(&self, network: Network) -> Result<Vec<String>> {
        let url = self.config.registry_urls.get(&network).ok_or_else(|| {
            Error::configuration(format!("no registry URL configured for {network}"))
        })?;
        let body =
            HttpResponseUtils::get_json(&self.client, url, self.config.timeout, "registry").await?;
        parse_registry_response(&body, network)
    }

    /// Static node list for `network`
    pub fn fallback(&self, network: Network) -> Vec<String> {
        self.config
            .fallback_nodes
            .get(&network)
            .cloned()
            .unwrap_or_default()
    }

    /// Forget cached results for one network, or for all when `None`
    pub async fn clear_cache(&self, network: Option<Network>) {
        match network {
            Some(network) => self.cache.invalidate(&network).await,
            None => self.cache.invalidate_all(),
        }
    }
}

impl std::fmt::Debug for NodeDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeDiscovery")
            .field("registries", &self.config.registry_urls)
            .field("cache_ttl", &self.config.cache_ttl)
            .finish_non_exhaustive()
    }
}
