//! Null Event Publisher
//!
//! Discards every event. Used when no observer is configured.

use async_trait::async_trait;
use std::sync::Arc;

use pctx_domain::error::Result;
use pctx_domain::events::{EventPublisher, ProviderEvent};

/// Event publisher that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventPublisher;

impl NullEventPublisher {
    /// Create a new null event publisher
    pub fn new() -> Self {
        Self
    }

    /// Create as Arc for sharing
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl EventPublisher for NullEventPublisher {
    async fn publish(&self, _event: ProviderEvent) -> Result<()> {
        Ok(())
    }

    fn has_subscribers(&self) -> bool {
        false
    }
}
