// Clippy allows for complex patterns in infrastructure code
#![allow(clippy::collapsible_if)]

//! # Platform Context SDK - Infrastructure Layer
//!
//! Composition and cross-cutting concerns on top of the provider crate.
//!
//! ## Module Categories
//!
//! ### Composition
//! | Module | Description |
//! |--------|-------------|
//! | [`priority`] | Priority failover with metrics, events and result caching |
//! | [`factory`] | Provider topologies from configuration |
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment configuration (defaults, TOML, `PCTX_` environment) |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//! | [`error_ext`] | Configuration context for foreign errors |

pub mod config;
pub mod constants;
pub mod error_ext;
pub mod factory;
pub mod logging;
pub mod priority;

// Re-export commonly used types
pub use config::{AppConfig, ConfigLoader};
pub use error_ext::ErrorContext;
pub use factory::ContextProviderFactory;
pub use priority::{
    PriorityConfig, PriorityContextProvider, ProviderEntry, ProviderInfo, ProviderMetricsRecorder,
};
