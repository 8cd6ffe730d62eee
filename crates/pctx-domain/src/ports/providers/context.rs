//! Context Provider Port
//!
//! Every source of platform state implements [`ContextProvider`]. Sources
//! with richer semantics additionally implement [`ExtendedContextProvider`]
//! and expose it through [`ContextProvider::as_extended`], so composing
//! providers never have to guess what a source supports.
//!
//! ## Example
//!
//! ```no_run
//! use pctx_domain::ports::ContextProvider;
//! use std::sync::Arc;
//!
//! async fn height(provider: Arc<dyn ContextProvider>) -> pctx_domain::Result<u64> {
//!     provider.get_latest_platform_block_height().await
//! }
//! ```

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::value_objects::{CapabilitySet, ContextOperation, QuorumMap};

/// Source of current platform state
///
/// Every method is safe to retry. A method either resolves with a value of
/// the declared type or fails with an explicit error; methods returning
/// `Option` resolve to `None` when the backend does not offer the data.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Latest platform block height
    async fn get_latest_platform_block_height(&self) -> Result<u64>;

    /// Latest platform block time in epoch milliseconds
    async fn get_latest_platform_block_time(&self) -> Result<u64>;

    /// Latest core chain-locked height known to the platform
    async fn get_latest_platform_core_chain_locked_height(&self) -> Result<u32>;

    /// Latest platform protocol version
    async fn get_latest_platform_version(&self) -> Result<String>;

    /// Number of blocks proposed by `proposer_id`
    async fn get_proposer_block_count(&self, proposer_id: &str) -> Result<Option<u64>>;

    /// Average time per block in milliseconds
    async fn get_time_per_block_millis(&self) -> Result<u64>;

    /// Proposer of the block at `height`
    async fn get_block_proposer(&self, height: u64) -> Result<Option<String>>;

    /// Current consensus quorum keys keyed by quorum hash
    async fn get_quorum_keys(&self) -> Result<Option<QuorumMap>> {
        Err(Error::not_supported(ContextOperation::QuorumKeys.as_str()))
    }

    /// Cheap reachability check
    async fn is_valid(&self) -> bool;

    /// The extended surface of this provider, if it has one
    fn as_extended(&self) -> Option<&dyn ExtendedContextProvider> {
        None
    }
}

/// Optional richer surface of a context provider
#[async_trait]
pub trait ExtendedContextProvider: ContextProvider {
    /// Stable provider name used in metrics and events
    fn provider_name(&self) -> &str;

    /// Capabilities this provider can serve
    fn capabilities(&self) -> CapabilitySet;

    /// Whether the provider is currently able to serve requests
    async fn is_available(&self) -> bool;

    /// Like [`is_available`](Self::is_available), but keeps the reason
    ///
    /// Providers whose readiness check is a real request override this so
    /// callers see the backend's own failure instead of a bare "unavailable".
    async fn check_availability(&self) -> Result<()> {
        if self.is_available().await {
            Ok(())
        } else {
            Err(Error::unavailable(self.provider_name()))
        }
    }
}
