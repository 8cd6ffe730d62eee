//! Single-Source Context Providers
//!
//! Each provider implements [`ContextProvider`](pctx_domain::ContextProvider)
//! against exactly one backend and owns its own caches.
//!
//! | Provider | Backend | Capabilities |
//! |----------|---------|--------------|
//! | [`StatusServiceContextProvider`] | REST status service | platform-state, block-proposer, quorum-keys |
//! | [`NodeListContextProvider`] | fixed pool of node addresses | platform-state |
//! | [`BridgeContextProvider`] | paired device over a framed transport | platform-state, block-proposer, quorum-keys |

pub mod bridge;
pub mod node_list;
pub mod status;
pub mod status_service;

pub use bridge::{
    BridgeConfig, BridgeContextProvider, BridgeState, BridgeTransport, ChannelTransport,
};
pub use node_list::{
    HttpNodeStatusClient, NodeListConfig, NodeListContextProvider, NodeStatusClient,
};
pub use status::{StatusCache, parse_platform_status};
pub use status_service::{StatusServiceConfig, StatusServiceContextProvider};
