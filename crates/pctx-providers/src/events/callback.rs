//! Callback Event Publisher
//!
//! Observer registration for consumers that want a synchronous callback per
//! event instead of a stream. Callbacks run on the publishing task, in
//! registration order, and must not block.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use pctx_domain::error::Result;
use pctx_domain::events::{EventPublisher, ProviderEvent};

/// Handle returned by [`CallbackEventPublisher::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&ProviderEvent) + Send + Sync>;

/// Event publisher dispatching to registered callbacks
#[derive(Default)]
pub struct CallbackEventPublisher {
    subscribers: RwLock<Vec<(SubscriptionId, Callback)>>,
    next_id: AtomicU64,
}

impl CallbackEventPublisher {
    /// Create a publisher with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for every future event
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ProviderEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));
        id
    }

    /// Remove a subscription; returns whether it existed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(sub, _)| *sub != id);
        subscribers.len() != before
    }

    /// Number of registered callbacks
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for CallbackEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackEventPublisher")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[async_trait]
impl EventPublisher for CallbackEventPublisher {
    async fn publish(&self, event: ProviderEvent) -> Result<()> {
        // Snapshot so a callback may subscribe or unsubscribe without deadlocking.
        let callbacks: Vec<Callback> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(&event);
        }
        Ok(())
    }

    fn has_subscribers(&self) -> bool {
        self.subscriber_count() > 0
    }
}
