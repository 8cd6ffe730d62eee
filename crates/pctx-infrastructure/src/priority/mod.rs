//! Priority Failover
//!
//! [`PriorityContextProvider`] presents one [`ContextProvider`] over an
//! ordered list of sources. Each call is routed to the providers that declare
//! the capability the operation needs and tried in descending priority until
//! one answers. Every attempt is timed and recorded by
//! [`ProviderMetricsRecorder`] and reported as a [`ProviderEvent`].
//!
//! [`ContextProvider`]: pctx_domain::ContextProvider
//! [`ProviderEvent`]: pctx_domain::ProviderEvent

pub mod metrics;
pub mod provider;

pub use metrics::ProviderMetricsRecorder;
pub use provider::{PriorityConfig, PriorityContextProvider, ProviderEntry, ProviderInfo};
