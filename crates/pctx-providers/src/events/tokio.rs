//! Tokio Broadcast Event Bus Provider
//!
//! In-process event distribution over a tokio broadcast channel. Events are
//! ephemeral: subscribers only see events published after they subscribed.
//!
//! ## Example
//!
//! ```no_run
//! use futures::StreamExt;
//! use pctx_providers::events::{EventBusProvider, TokioEventBusProvider};
//!
//! # async fn run() -> pctx_domain::Result<()> {
//! let bus = TokioEventBusProvider::new();
//! let mut events = bus.subscribe_events().await?;
//! while let Some(event) = events.next().await {
//!     println!("{}", event.name());
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use futures::stream;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use pctx_domain::error::Result;
use pctx_domain::events::{EventPublisher, ProviderEvent};
use pctx_domain::ports::{EventBusProvider, ProviderEventStream};

use crate::constants::EVENT_BUS_CAPACITY;

/// Event bus provider using tokio broadcast channels
///
/// When the channel is full the oldest events are dropped and lagging
/// subscribers skip ahead.
#[derive(Clone)]
pub struct TokioEventBusProvider {
    sender: Arc<broadcast::Sender<ProviderEvent>>,
    capacity: usize,
}

impl TokioEventBusProvider {
    /// Create a new tokio event bus with default capacity (1024)
    pub fn new() -> Self {
        Self::with_capacity(EVENT_BUS_CAPACITY)
    }

    /// Create with custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
            capacity,
        }
    }

    /// Create as Arc for sharing
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Get the current number of subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for TokioEventBusProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokioEventBusProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioEventBusProvider")
            .field("capacity", &self.capacity)
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

#[async_trait]
impl EventPublisher for TokioEventBusProvider {
    async fn publish(&self, event: ProviderEvent) -> Result<()> {
        let name = event.name();
        match self.sender.send(event) {
            Ok(count) => debug!(event = name, subscribers = count, "published provider event"),
            Err(_) => debug!(event = name, "published provider event but no subscribers"),
        }
        Ok(())
    }

    fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

#[async_trait]
impl EventBusProvider for TokioEventBusProvider {
    async fn subscribe_events(&self) -> Result<ProviderEventStream> {
        let receiver = self.sender.subscribe();

        let stream = stream::unfold(receiver, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(event) => return Some((event, rx)),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Event stream lagged by {} events", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });

        Ok(Box::pin(stream))
    }
}
