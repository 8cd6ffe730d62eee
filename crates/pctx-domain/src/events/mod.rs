//! Provider Events
//!
//! Lifecycle events emitted by a composing context provider while it tries
//! its sources. The set of events is closed so that observers can match on
//! it exhaustively.
//!
//! | Event | Emitted when |
//! |-------|--------------|
//! | [`ProviderEvent::ProviderUsed`] | a provider answered an operation |
//! | [`ProviderEvent::ProviderError`] | a provider attempt failed |
//! | [`ProviderEvent::ProviderFallback`] | the next provider is tried after a failure |
//! | [`ProviderEvent::AllFailed`] | every candidate failed |

/// Provider event definitions and publisher interface
pub mod provider_events;

pub use provider_events::{EventPublisher, ProviderEvent};
