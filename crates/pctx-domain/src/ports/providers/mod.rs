//! Context Provider Ports
//!
//! | Port | Description |
//! |------|-------------|
//! | [`ContextProvider`] | Base contract every platform-state source satisfies |
//! | [`ExtendedContextProvider`] | Optional name, capability and availability surface |

/// Context provider contracts
pub mod context;

pub use context::{ContextProvider, ExtendedContextProvider};
