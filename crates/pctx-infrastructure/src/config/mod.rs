//! Configuration types and loading
//!
//! Sources are merged by [`ConfigLoader`] with figment: defaults, then a TOML
//! file, then `PCTX_`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::*;
