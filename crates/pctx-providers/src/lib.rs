// Allow collapsible_if for complex conditional logic
#![allow(clippy::collapsible_if)]

//! # Platform Context SDK - Provider Implementations
//!
//! Adapters implementing the ports of `pctx-domain`.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Context | `ContextProvider` | StatusService, NodeList, Bridge |
//! | Events | `EventPublisher` | Tokio, Callback, Null |
//! | Discovery | - | `NodeDiscovery` |
//! | Cache | - | `TtlLruCache`, `JsonCache` |
//!
//! ## Usage
//!
//! ```no_run
//! use pctx_providers::context::{StatusServiceConfig, StatusServiceContextProvider};
//! use pctx_domain::ContextProvider;
//!
//! # async fn run() -> pctx_domain::Result<()> {
//! let provider = StatusServiceContextProvider::new(StatusServiceConfig::new(
//!     "https://status.example.org",
//! ))?;
//! let height = provider.get_latest_platform_block_height().await?;
//! # Ok(())
//! # }
//! ```

pub use pctx_domain::error::{Error, Result};
pub use pctx_domain::ports::{ContextProvider, ExtendedContextProvider};

/// Provider-specific constants
pub mod constants;

/// Shared utilities for provider implementations
pub mod utils;

/// Time-expiring LRU caches
pub mod cache;

/// Single-source context providers
pub mod context;

/// Node discovery
pub mod discovery;

/// Event publisher implementations
pub mod events;

/// HTTP client configuration and error classification
pub mod http;

/// Retry policy with exponential backoff
pub mod retry;

pub use cache::{CacheStats, JsonCache, TtlLruCache};
pub use context::{
    BridgeConfig, BridgeContextProvider, BridgeState, NodeListConfig, NodeListContextProvider,
    StatusServiceConfig, StatusServiceContextProvider,
};
pub use discovery::{DiscoveryConfig, NodeDiscovery};
pub use events::{CallbackEventPublisher, NullEventPublisher, TokioEventBusProvider};
pub use retry::RetryPolicy;
