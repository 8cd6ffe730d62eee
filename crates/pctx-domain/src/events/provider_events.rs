use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::value_objects::ContextOperation;

/// Observable lifecycle event of a priority invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderEvent {
    /// A provider answered the operation
    ProviderUsed {
        /// Provider name
        provider: String,
        /// Operation it answered
        operation: ContextOperation,
    },
    /// A provider attempt failed
    ProviderError {
        /// Provider name
        provider: String,
        /// Rendered error
        error: String,
    },
    /// The invocation moves on to the next provider after a failure
    ProviderFallback {
        /// Provider that just failed
        from: String,
        /// Provider about to be tried
        to: String,
    },
    /// Every candidate failed
    AllFailed {
        /// Operation that was attempted
        operation: ContextOperation,
        /// Rendered error per provider name
        errors: BTreeMap<String, String>,
    },
}

impl ProviderEvent {
    /// Event name in the `provider:used` notation
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProviderUsed { .. } => "provider:used",
            Self::ProviderError { .. } => "provider:error",
            Self::ProviderFallback { .. } => "provider:fallback",
            Self::AllFailed { .. } => "all:failed",
        }
    }
}

/// Domain port for publishing provider events
///
/// # Example
///
/// ```rust,no_run
/// use pctx_domain::events::{EventPublisher, ProviderEvent};
/// use pctx_domain::value_objects::ContextOperation;
///
/// async fn announce(publisher: &dyn EventPublisher) -> pctx_domain::Result<()> {
///     publisher
///         .publish(ProviderEvent::ProviderUsed {
///             provider: "status-service".to_string(),
///             operation: ContextOperation::LatestPlatformBlockHeight,
///         })
///         .await
/// }
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Deliver an event to every current subscriber
    ///
    /// Having no subscriber is not an error.
    async fn publish(&self, event: ProviderEvent) -> Result<()>;

    /// Whether anyone is listening
    fn has_subscribers(&self) -> bool;
}
