//! Main application configuration

use pctx_domain::value_objects::Network;
use serde::{Deserialize, Serialize};

use super::{DiscoverySettings, LoggingConfig, ProvidersConfig, RetrySettings};

/// Root configuration of the SDK
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Network the client talks to
    #[serde(default)]
    pub network: Network,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Context provider configuration
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Node discovery configuration
    #[serde(default)]
    pub discovery: DiscoverySettings,
    /// Retry policy shared by the network providers
    #[serde(default)]
    pub retry: RetrySettings,
}
