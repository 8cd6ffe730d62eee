//! Configuration types module

pub mod app;
pub mod discovery;
pub mod logging;
pub mod providers;
pub mod retry;

// Re-export main types
pub use app::AppConfig;
pub use discovery::DiscoverySettings;
pub use logging::LoggingConfig;
pub use providers::{
    BridgeSettings, NodeListSettings, PrioritySettings, ProvidersConfig, StatusServiceSettings,
};
pub use retry::RetrySettings;
