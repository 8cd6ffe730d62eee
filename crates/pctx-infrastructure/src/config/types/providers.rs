//! Context provider configuration types

use std::time::Duration;

use pctx_domain::constants::{
    DEFAULT_CACHE_CAPACITY, PLATFORM_STATE_CACHE_TTL_MS, QUORUM_KEYS_CACHE_TTL_MS,
};
use pctx_domain::value_objects::Network;
use pctx_providers::constants::{
    BRIDGE_MAX_FRAME_SIZE, BRIDGE_REQUEST_TIMEOUT_MS, DEFAULT_NODE_SCHEME, NODE_STATUS_TIMEOUT_MS,
    STATUS_SERVICE_TIMEOUT_MS,
};
use pctx_providers::context::{BridgeConfig, NodeListConfig, StatusServiceConfig};
use pctx_providers::retry::RetryPolicy;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BRIDGE_DEFAULT_PRIORITY, NODE_LIST_DEFAULT_PRIORITY, PRIORITY_CACHE_TTL_MS,
    STATUS_SERVICE_DEFAULT_PRIORITY,
};

/// Provider configurations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// REST status service
    #[serde(default)]
    pub status_service: StatusServiceSettings,
    /// Fixed node list
    #[serde(default)]
    pub node_list: NodeListSettings,
    /// Paired-device bridge
    #[serde(default)]
    pub bridge: BridgeSettings,
    /// Priority composition
    #[serde(default)]
    pub priority: PrioritySettings,
}

/// Status service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusServiceSettings {
    /// Service base URL; the provider is left out when unset
    pub base_url: Option<String>,
    /// Per-request timeout (ms)
    pub timeout_ms: u64,
    /// Freshness window for platform-state values (ms)
    pub cache_ttl_ms: u64,
    /// Freshness window for quorum keys (ms)
    pub quorum_cache_ttl_ms: u64,
    /// Maximum cached entries
    pub cache_capacity: usize,
}

impl Default for StatusServiceSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: STATUS_SERVICE_TIMEOUT_MS,
            cache_ttl_ms: PLATFORM_STATE_CACHE_TTL_MS,
            quorum_cache_ttl_ms: QUORUM_KEYS_CACHE_TTL_MS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl StatusServiceSettings {
    /// Provider configuration for `base_url`
    pub fn provider_config(&self, base_url: &str, retry: RetryPolicy) -> StatusServiceConfig {
        StatusServiceConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_millis(self.timeout_ms),
            cache_ttl: Duration::from_millis(self.cache_ttl_ms),
            quorum_cache_ttl: Duration::from_millis(self.quorum_cache_ttl_ms),
            cache_capacity: self.cache_capacity,
            retry,
        }
    }
}

/// Fixed node list settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeListSettings {
    /// Whether the node list joins the priority composition
    pub enabled: bool,
    /// Node addresses; discovered when empty
    pub nodes: Vec<String>,
    /// URL scheme used to reach the nodes
    pub scheme: String,
    /// Per-node request timeout (ms)
    pub timeout_ms: u64,
    /// Freshness window for status values (ms)
    pub cache_ttl_ms: u64,
    /// Maximum cached entries
    pub cache_capacity: usize,
    /// Whether explicit status requests may return placeholder data
    pub allow_synthesized: bool,
}

impl Default for NodeListSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            nodes: Vec::new(),
            scheme: DEFAULT_NODE_SCHEME.to_string(),
            timeout_ms: NODE_STATUS_TIMEOUT_MS,
            cache_ttl_ms: PLATFORM_STATE_CACHE_TTL_MS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            allow_synthesized: false,
        }
    }
}

impl NodeListSettings {
    /// Provider configuration for `network`
    ///
    /// Node addresses are taken from the settings; callers seeding the list
    /// from discovery replace them.
    pub fn provider_config(&self, network: Network) -> NodeListConfig {
        NodeListConfig {
            nodes: self.nodes.clone(),
            network,
            scheme: self.scheme.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
            cache_ttl: Duration::from_millis(self.cache_ttl_ms),
            cache_capacity: self.cache_capacity,
            allow_synthesized: self.allow_synthesized,
            retry: RetryPolicy::no_retry(),
        }
    }
}

/// Bridge settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Deadline for one request (ms)
    pub request_timeout_ms: u64,
    /// Freshness window for platform-state values (ms)
    pub cache_ttl_ms: u64,
    /// Freshness window for quorum keys (ms)
    pub quorum_cache_ttl_ms: u64,
    /// Maximum cached entries
    pub cache_capacity: usize,
    /// Largest frame the link accepts, header included
    pub max_frame_size: usize,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            request_timeout_ms: BRIDGE_REQUEST_TIMEOUT_MS,
            cache_ttl_ms: PLATFORM_STATE_CACHE_TTL_MS,
            quorum_cache_ttl_ms: QUORUM_KEYS_CACHE_TTL_MS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_frame_size: BRIDGE_MAX_FRAME_SIZE,
        }
    }
}

impl BridgeSettings {
    /// Provider configuration
    pub fn provider_config(&self) -> BridgeConfig {
        BridgeConfig {
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            cache_ttl: Duration::from_millis(self.cache_ttl_ms),
            quorum_cache_ttl: Duration::from_millis(self.quorum_cache_ttl_ms),
            cache_capacity: self.cache_capacity,
        }
    }
}

/// Priority composition settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrioritySettings {
    /// Cache results across providers
    pub cache_results: bool,
    /// Freshness window of the result cache (ms)
    pub cache_ttl_ms: u64,
    /// Maximum cached results
    pub cache_capacity: usize,
    /// Log every failure swallowed by fallback
    pub log_errors: bool,
    /// Priority of the bridge
    pub bridge_priority: i32,
    /// Priority of the status service
    pub status_service_priority: i32,
    /// Priority of the node list
    pub node_list_priority: i32,
}

impl Default for PrioritySettings {
    fn default() -> Self {
        Self {
            cache_results: true,
            cache_ttl_ms: PRIORITY_CACHE_TTL_MS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            log_errors: true,
            bridge_priority: BRIDGE_DEFAULT_PRIORITY,
            status_service_priority: STATUS_SERVICE_DEFAULT_PRIORITY,
            node_list_priority: NODE_LIST_DEFAULT_PRIORITY,
        }
    }
}
