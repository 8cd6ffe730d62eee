//! Node Discovery
//!
//! Resolves the currently reachable platform nodes of a network from a
//! registry endpoint, normalizes their addresses to the public gateway port
//! and falls back to a static list whenever the registry cannot help.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`NodeDiscovery`] | Cached discovery with static fallback |
//! | [`DiscoveryConfig`] | Registry URLs, fallback lists, freshness window |
//! | [`parse_registry_response`] | Pure record filtering and normalization |

mod provider;
mod registry;

pub use provider::{DiscoveryConfig, NodeDiscovery};
pub use registry::{normalize_service_address, parse_registry_response};
