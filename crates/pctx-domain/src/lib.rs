//! # Platform Context SDK - Domain Layer
//!
//! Core contracts of the context-provider subsystem. This crate defines what a
//! source of platform state looks like and which events a composing provider
//! emits. It performs no I/O.
//!
//! ## Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ports`] | `ContextProvider`, `ExtendedContextProvider`, `EventBusProvider` |
//! | [`events`] | `ProviderEvent` and the `EventPublisher` port |
//! | [`value_objects`] | capabilities, operations, metrics, status, networks |
//! | [`error`] | the error taxonomy shared by every layer |
//! | [`constants`] | freshness windows, ports, activation heights |

/// Domain constants
pub mod constants;
/// Error taxonomy
pub mod error;
/// Provider lifecycle events
pub mod events;
/// Port traits implemented by providers and infrastructure
pub mod ports;
/// Immutable value objects
pub mod value_objects;

pub use error::{Error, ProviderFailure, Result};
pub use events::{EventPublisher, ProviderEvent};
pub use ports::{ContextProvider, EventBusProvider, ExtendedContextProvider, ProviderEventStream};
pub use value_objects::{
    Capability, CapabilitySet, ContextOperation, Network, PlatformStatus, ProviderMetrics,
    QuorumInfo, QuorumMap, StatusSource,
};
