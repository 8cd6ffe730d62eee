//! Node discovery configuration types

use std::collections::BTreeMap;
use std::time::Duration;

use pctx_domain::error::Result;
use pctx_domain::value_objects::Network;
use pctx_providers::discovery::DiscoveryConfig;
use serde::{Deserialize, Serialize};

/// Node discovery settings, keyed by network name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// How long a successful discovery stays fresh (s)
    pub cache_ttl_secs: u64,
    /// Registry request timeout (ms)
    pub timeout_ms: u64,
    /// Registry endpoint per network
    pub registry_urls: BTreeMap<String, String>,
    /// Static node list per network
    pub fallback_nodes: BTreeMap<String, Vec<String>>,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        let defaults = DiscoveryConfig::default();
        Self {
            cache_ttl_secs: defaults.cache_ttl.as_secs(),
            timeout_ms: u64::try_from(defaults.timeout.as_millis()).unwrap_or(u64::MAX),
            registry_urls: defaults
                .registry_urls
                .into_iter()
                .map(|(network, url)| (network.to_string(), url))
                .collect(),
            fallback_nodes: defaults
                .fallback_nodes
                .into_iter()
                .map(|(network, nodes)| (network.to_string(), nodes))
                .collect(),
        }
    }
}

impl DiscoverySettings {
    /// Discovery configuration with network names resolved
    pub fn discovery_config(&self) -> Result<DiscoveryConfig> {
        let registry_urls = self
            .registry_urls
            .iter()
            .map(|(name, url)| Ok((name.parse::<Network>()?, url.clone())))
            .collect::<Result<BTreeMap<_, _>>>()?;
        let fallback_nodes = self
            .fallback_nodes
            .iter()
            .map(|(name, nodes)| Ok((name.parse::<Network>()?, nodes.clone())))
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(DiscoveryConfig {
            registry_urls,
            fallback_nodes,
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            timeout: Duration::from_millis(self.timeout_ms),
        })
    }
}
