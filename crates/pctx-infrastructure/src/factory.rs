//! Provider Factory
//!
//! Wires single-source providers and priority compositions from an
//! [`AppConfig`]. Default priorities put a paired device first, a dedicated
//! status service next and the generic node list last.
//!
//! ## Example
//!
//! ```no_run
//! use pctx_infrastructure::config::ConfigLoader;
//! use pctx_infrastructure::factory::ContextProviderFactory;
//! use pctx_domain::ContextProvider;
//!
//! # async fn run() -> pctx_domain::Result<()> {
//! let config = ConfigLoader::new().load()?;
//! let factory = ContextProviderFactory::new(config)?;
//! let provider = factory.build(None).await?;
//! let height = provider.get_latest_platform_block_height().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use pctx_domain::error::{Error, Result};
use pctx_domain::events::EventPublisher;
use pctx_providers::context::{
    BridgeContextProvider, BridgeTransport, ChannelTransport, NodeListContextProvider,
    StatusServiceContextProvider,
};
use pctx_providers::discovery::NodeDiscovery;
use pctx_providers::events::NullEventPublisher;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::AppConfig;
use crate::constants::BRIDGE_CHANNEL_BUFFER;
use crate::priority::{PriorityConfig, PriorityContextProvider, ProviderEntry};

/// Builds context providers from configuration
pub struct ContextProviderFactory {
    config: AppConfig,
    events: Arc<dyn EventPublisher>,
    discovery: Arc<NodeDiscovery>,
}

impl ContextProviderFactory {
    /// Create a factory with its own discovery instance and no event sink
    pub fn new(config: AppConfig) -> Result<Self> {
        let discovery = Arc::new(NodeDiscovery::new(config.discovery.discovery_config()?)?);
        Ok(Self {
            config,
            events: NullEventPublisher::new_shared(),
            discovery,
        })
    }

    /// Publish priority-provider events to `events`
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = events;
        self
    }

    /// Share an existing discovery instance
    #[must_use]
    pub fn with_discovery(mut self, discovery: Arc<NodeDiscovery>) -> Self {
        self.discovery = discovery;
        self
    }

    /// Configuration the factory builds from
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Discovery instance used for node lists
    pub fn discovery(&self) -> &Arc<NodeDiscovery> {
        &self.discovery
    }

    /// Status service provider, or `None` when no base URL is configured
    pub fn status_service(&self) -> Result<Option<Arc<StatusServiceContextProvider>>> {
        let settings = &self.config.providers.status_service;
        let Some(base_url) = settings.base_url.as_deref() else {
            return Ok(None);
        };
        let provider = StatusServiceContextProvider::new(
            settings.provider_config(base_url, self.config.retry.policy()),
        )?;
        Ok(Some(Arc::new(provider)))
    }

    /// Node list provider over the configured nodes, or discovered ones
    pub async fn node_list(&self) -> Result<Arc<NodeListContextProvider>> {
        let settings = &self.config.providers.node_list;
        let config = settings.provider_config(self.config.network);
        let provider = if settings.nodes.is_empty() {
            NodeListContextProvider::from_discovery(&self.discovery, config).await?
        } else {
            NodeListContextProvider::new(config)?
        };
        Ok(Arc::new(provider))
    }

    /// Bridge provider over `transport`
    pub fn bridge(&self, transport: Arc<dyn BridgeTransport>) -> Arc<BridgeContextProvider> {
        Arc::new(BridgeContextProvider::new(
            transport,
            self.config.providers.bridge.provider_config(),
        ))
    }

    /// Bridge provider over an in-process channel
    ///
    /// Returns the provider and the receiver a link driver reads outbound
    /// frames from. Inbound frames are attached with
    /// [`BridgeContextProvider::connect`].
    pub fn bridge_channel(&self) -> (Arc<BridgeContextProvider>, mpsc::Receiver<Vec<u8>>) {
        let (transport, outbound) = ChannelTransport::pair(
            self.config.providers.bridge.max_frame_size,
            BRIDGE_CHANNEL_BUFFER,
        );
        (self.bridge(Arc::new(transport)), outbound)
    }

    /// Priority provider settings from configuration
    pub fn priority_config(&self) -> PriorityConfig {
        let settings = &self.config.providers.priority;
        PriorityConfig {
            cache_results: settings.cache_results,
            cache_ttl: Duration::from_millis(settings.cache_ttl_ms),
            cache_capacity: settings.cache_capacity,
            log_errors: settings.log_errors,
            ..PriorityConfig::default()
        }
    }

    /// Priority provider over explicit entries
    pub fn priority_over(
        &self,
        entries: impl IntoIterator<Item = ProviderEntry>,
    ) -> Result<PriorityContextProvider> {
        PriorityContextProvider::with_providers(
            self.priority_config(),
            Arc::clone(&self.events),
            entries,
        )
    }

    /// The default composition
    ///
    /// Includes `bridge` when given, the status service when configured and
    /// the node list when enabled, each at its configured priority.
    pub async fn build(
        &self,
        bridge: Option<Arc<BridgeContextProvider>>,
    ) -> Result<PriorityContextProvider> {
        let priorities = &self.config.providers.priority;
        let mut entries = Vec::new();

        if let Some(bridge) = bridge {
            entries.push(ProviderEntry::named(priorities.bridge_priority, bridge));
        }
        if let Some(status) = self.status_service()? {
            entries.push(ProviderEntry::named(priorities.status_service_priority, status));
        }
        if self.config.providers.node_list.enabled {
            let nodes = self.node_list().await?;
            entries.push(ProviderEntry::named(priorities.node_list_priority, nodes));
        }

        if entries.is_empty() {
            return Err(Error::configuration(
                "no context provider is enabled; configure a status service, a node list or a bridge",
            ));
        }

        info!(
            network = %self.config.network,
            providers = entries.len(),
            "built priority context provider"
        );
        self.priority_over(entries)
    }
}

impl std::fmt::Debug for ContextProviderFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextProviderFactory")
            .field("network", &self.config.network)
            .field("discovery", &self.discovery)
            .finish_non_exhaustive()
    }
}
