//! Domain Port Interfaces
//!
//! Boundary contracts between the domain and the layers that implement it.
//!
//! - **providers/** - sources of platform state (`ContextProvider`)
//! - **infrastructure/** - event bus subscription (`EventBusProvider`)

/// Infrastructure service ports
pub mod infrastructure;
/// Context provider ports
pub mod providers;

pub use infrastructure::{EventBusProvider, ProviderEventStream};
pub use providers::{ContextProvider, ExtendedContextProvider};
