//! Event Bus Provider Port
//!
//! Streaming subscription on top of [`EventPublisher`]. Implementations live
//! in `pctx-providers`.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::error::Result;
use crate::events::{EventPublisher, ProviderEvent};

/// Boxed async stream of provider events
pub type ProviderEventStream = Pin<Box<dyn Stream<Item = ProviderEvent> + Send + Sync + 'static>>;

/// Event publisher that can also hand out subscription streams
#[async_trait]
pub trait EventBusProvider: EventPublisher {
    /// Subscribe to every event published after this call
    async fn subscribe_events(&self) -> Result<ProviderEventStream>;
}
