//! Scripted context providers for priority tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pctx_domain::{
    Capability, CapabilitySet, ContextProvider, Error, ExtendedContextProvider, ProviderEvent,
    ProviderEventStream, Result,
};
use futures::StreamExt;

/// Provider answering from a script of outcomes
pub struct ScriptedProvider {
    name: String,
    height: Option<u64>,
    script: Mutex<VecDeque<bool>>,
    available: bool,
    extended: bool,
    capabilities: CapabilitySet,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    /// Provider that always answers `height`
    pub fn healthy(name: &str, height: u64) -> Self {
        Self {
            name: name.to_string(),
            height: Some(height),
            script: Mutex::new(VecDeque::new()),
            available: true,
            extended: true,
            capabilities: Capability::baseline(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider that always fails
    pub fn failing(name: &str) -> Self {
        Self {
            height: None,
            ..Self::healthy(name, 0)
        }
    }

    /// Answer with the given outcomes first (`true` succeeds)
    pub fn scripted(mut self, outcomes: &[bool]) -> Self {
        self.script = Mutex::new(outcomes.iter().copied().collect());
        self
    }

    /// Report unavailable through the availability check
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Hide the extended surface
    pub fn plain(mut self) -> Self {
        self.extended = false;
        self
    }

    /// Declare exactly these capabilities
    pub fn with_capabilities(mut self, capabilities: &[Capability]) -> Self {
        self.capabilities = capabilities.iter().copied().collect();
        self
    }

    /// Sleep this long on every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of operation calls received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    async fn answer<T>(&self, value: impl FnOnce(u64) -> T) -> Result<T> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let scripted = self.script.lock().unwrap().pop_front();
        match (scripted, self.height) {
            (Some(true), Some(height)) | (None, Some(height)) => Ok(value(height)),
            _ => Err(Error::network(format!("{} failed call {call}", self.name))),
        }
    }
}

#[async_trait]
impl ContextProvider for ScriptedProvider {
    async fn get_latest_platform_block_height(&self) -> Result<u64> {
        self.answer(|h| h).await
    }

    async fn get_latest_platform_block_time(&self) -> Result<u64> {
        self.answer(|h| h * 1000).await
    }

    async fn get_latest_platform_core_chain_locked_height(&self) -> Result<u32> {
        self.answer(|h| u32::try_from(h).unwrap_or(u32::MAX)).await
    }

    async fn get_latest_platform_version(&self) -> Result<String> {
        let name = self.name.clone();
        self.answer(move |_| format!("version-from-{name}")).await
    }

    async fn get_proposer_block_count(&self, _proposer_id: &str) -> Result<Option<u64>> {
        self.answer(|_| None).await
    }

    async fn get_time_per_block_millis(&self) -> Result<u64> {
        self.answer(|_| 5000).await
    }

    async fn get_block_proposer(&self, height: u64) -> Result<Option<String>> {
        let name = self.name.clone();
        self.answer(move |_| Some(format!("{name}-proposer-{height}")))
            .await
    }

    async fn is_valid(&self) -> bool {
        self.height.is_some()
    }

    fn as_extended(&self) -> Option<&dyn ExtendedContextProvider> {
        if self.extended { Some(self) } else { None }
    }
}

#[async_trait]
impl ExtendedContextProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> CapabilitySet {
        self.capabilities.clone()
    }

    async fn is_available(&self) -> bool {
        self.available
    }
}

/// Take the next `n` events from a subscription
pub async fn next_events(stream: &mut ProviderEventStream, n: usize) -> Vec<ProviderEvent> {
    let mut events = Vec::with_capacity(n);
    for _ in 0..n {
        let event = tokio::time::timeout(Duration::from_secs(1), stream.next())
            .await
            .expect("event not published")
            .expect("event stream closed");
        events.push(event);
    }
    events
}
