//! Domain Value Objects
//!
//! Immutable value objects describing what providers can do and what they
//! return.
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`Capability`] | Closed set of capability tags a provider may declare |
//! | [`ContextOperation`] | One logical operation of the context contract |
//! | [`ProviderMetrics`] | Per-provider success/error/latency counters |
//! | [`PlatformStatus`] | Aggregate platform state from one status round trip |
//! | [`QuorumInfo`] | Public key material of one consensus quorum |
//! | [`Network`] | Network environment with its port and height constants |

/// Capability tags
pub mod capability;
/// Provider metrics snapshot
pub mod metrics;
/// Network environments
pub mod network;
/// Context operations and their routing
pub mod operation;
/// Platform status and quorum data
pub mod status;

pub use capability::{Capability, CapabilitySet};
pub use metrics::ProviderMetrics;
pub use network::Network;
pub use operation::ContextOperation;
pub use status::{PlatformStatus, QuorumInfo, QuorumMap, StatusSource};
