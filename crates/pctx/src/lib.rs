//! # Platform Context SDK
//!
//! Current platform state (block height, block time, chain-locked height,
//! protocol version, proposers, quorum keys) from several independent
//! sources, with priority failover, per-source metrics and lifecycle events.
//!
//! This crate is the public facade. It re-exports the three layers of the
//! workspace.
//!
//! ## Example
//!
//! ```no_run
//! use pctx::ContextProvider;
//! use pctx::infrastructure::{ConfigLoader, ContextProviderFactory};
//!
//! # async fn run() -> pctx::Result<()> {
//! let config = ConfigLoader::new().load()?;
//! let provider = ContextProviderFactory::new(config)?.build(None).await?;
//!
//! let height = provider.get_latest_platform_block_height().await?;
//! for (name, metrics) in provider.get_metrics() {
//!     println!("{name}: {} ok / {} failed", metrics.success_count, metrics.error_count);
//! }
//! # let _ = height;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - `domain` - ports, value objects, events and the error taxonomy
//! - `providers` - cache, retry, discovery, event buses and single-source providers
//! - `infrastructure` - priority composition, factory, configuration and logging

/// Domain layer - ports, value objects and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use pctx_domain::*;
}

/// Provider layer - single-source providers and their building blocks
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use pctx_providers::*;
}

/// Infrastructure layer - priority composition, factory, config and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use pctx_infrastructure::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;

// Re-export the composition entry points at the crate root
pub use infrastructure::{
    AppConfig, ConfigLoader, ContextProviderFactory, PriorityConfig, PriorityContextProvider,
    ProviderEntry,
};
