//! Priority Context Provider

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use pctx_domain::constants::DEFAULT_CACHE_CAPACITY;
use pctx_domain::error::{Error, ProviderFailure, Result};
use pctx_domain::events::{EventPublisher, ProviderEvent};
use pctx_domain::ports::{ContextProvider, ExtendedContextProvider};
use pctx_domain::value_objects::{
    Capability, CapabilitySet, ContextOperation, ProviderMetrics, QuorumMap,
};
use pctx_providers::cache::JsonCache;
use pctx_providers::events::NullEventPublisher;

use super::metrics::ProviderMetricsRecorder;
use crate::constants::{PRIORITY_CACHE_TTL_MS, PRIORITY_PROVIDER_NAME};

/// A source registered with a priority provider
#[derive(Clone)]
pub struct ProviderEntry {
    name: String,
    priority: i32,
    provider: Arc<dyn ContextProvider>,
}

impl ProviderEntry {
    /// Register `provider` under `name`; higher priorities are tried first
    pub fn new(name: impl Into<String>, priority: i32, provider: Arc<dyn ContextProvider>) -> Self {
        Self {
            name: name.into(),
            priority,
            provider,
        }
    }

    /// Register a provider under its own name
    pub fn named<P>(priority: i32, provider: Arc<P>) -> Self
    where
        P: ExtendedContextProvider + 'static,
    {
        let name = provider.provider_name().to_string();
        Self::new(name, priority, provider)
    }

    /// Name used in metrics, events and errors
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attempt order key
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// The wrapped provider
    pub fn provider(&self) -> &Arc<dyn ContextProvider> {
        &self.provider
    }

    /// Declared capabilities, or the baseline set for plain providers
    pub fn capabilities(&self) -> CapabilitySet {
        self.provider
            .as_extended()
            .map_or_else(Capability::baseline, |extended| extended.capabilities())
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: self.name.clone(),
            priority: self.priority,
            capabilities: self.capabilities(),
        }
    }
}

impl std::fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Description of a registered provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    /// Provider name
    pub name: String,
    /// Priority
    pub priority: i32,
    /// Capabilities used for routing
    pub capabilities: CapabilitySet,
}

/// Priority provider settings
#[derive(Debug, Clone)]
pub struct PriorityConfig {
    /// Name reported when this provider is nested in another one
    pub name: String,
    /// Cache successful results across providers
    pub cache_results: bool,
    /// Freshness window of the result cache
    pub cache_ttl: Duration,
    /// Maximum cached results
    pub cache_capacity: usize,
    /// Log every failure swallowed by fallback
    pub log_errors: bool,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            name: PRIORITY_PROVIDER_NAME.to_string(),
            cache_results: true,
            cache_ttl: Duration::from_millis(PRIORITY_CACHE_TTL_MS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            log_errors: true,
        }
    }
}

/// Context provider failing over across an ordered list of providers
///
/// Attempts within one call are strictly sequential. Membership changes take
/// effect for calls started afterwards.
pub struct PriorityContextProvider {
    name: String,
    entries: RwLock<Vec<ProviderEntry>>,
    metrics: ProviderMetricsRecorder,
    cache: Option<JsonCache>,
    events: Arc<dyn EventPublisher>,
    log_errors: bool,
    selected: Mutex<Option<String>>,
}

impl PriorityContextProvider {
    /// Create an empty priority provider that discards events
    pub fn new(config: PriorityConfig) -> Self {
        Self::with_events(config, NullEventPublisher::new_shared())
    }

    /// Create an empty priority provider publishing to `events`
    pub fn with_events(config: PriorityConfig, events: Arc<dyn EventPublisher>) -> Self {
        let cache = config
            .cache_results
            .then(|| JsonCache::new(config.cache_ttl, config.cache_capacity));
        Self {
            name: config.name,
            entries: RwLock::new(Vec::new()),
            metrics: ProviderMetricsRecorder::new(),
            cache,
            events,
            log_errors: config.log_errors,
            selected: Mutex::new(None),
        }
    }

    /// Create a priority provider over `entries`
    pub fn with_providers(
        config: PriorityConfig,
        events: Arc<dyn EventPublisher>,
        entries: impl IntoIterator<Item = ProviderEntry>,
    ) -> Result<Self> {
        let provider = Self::with_events(config, events);
        for entry in entries {
            provider.add_provider(entry)?;
        }
        Ok(provider)
    }

    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, Vec<ProviderEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a provider and re-sort by priority
    ///
    /// Equal priorities keep registration order. Names must be unique.
    pub fn add_provider(&self, entry: ProviderEntry) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.iter().any(|e| e.name == entry.name) {
            return Err(Error::invalid_argument(format!(
                "provider `{}` is already registered",
                entry.name
            )));
        }
        self.metrics.register(&entry.name);
        debug!(provider = %entry.name, priority = entry.priority, "registered context provider");
        entries.push(entry);
        entries.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(())
    }

    /// Unregister a provider and drop its metrics; returns whether it existed
    pub fn remove_provider(&self, name: &str) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|e| e.name != name);
        let removed = entries.len() != before;
        if removed {
            self.metrics.remove(name);
            debug!(provider = name, "removed context provider");
        }
        removed
    }

    /// Registered providers in attempt order
    pub fn providers(&self) -> Vec<ProviderInfo> {
        self.read_entries().iter().map(ProviderEntry::info).collect()
    }

    /// Copy of every provider's metrics
    pub fn get_metrics(&self) -> BTreeMap<String, ProviderMetrics> {
        self.metrics.snapshot()
    }

    /// Drop every cached result
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// First provider, in priority order, that reports itself usable
    ///
    /// Extended providers answer through their availability check, plain
    /// providers through `is_valid`. The result cache is not consulted.
    pub async fn get_active_provider(&self) -> Option<ProviderInfo> {
        let entries = self.read_entries().clone();
        for entry in entries {
            let usable = match entry.provider.as_extended() {
                Some(extended) => extended.is_available().await,
                None => entry.provider.is_valid().await,
            };
            if usable {
                return Some(entry.info());
            }
        }
        None
    }

    fn candidates(&self, capability: Capability) -> Vec<ProviderEntry> {
        self.read_entries()
            .iter()
            .filter(|e| e.capabilities().contains(&capability))
            .cloned()
            .collect()
    }

    async fn publish(&self, event: ProviderEvent) {
        if let Err(e) = self.events.publish(event).await {
            debug!(error = %e, "failed to publish provider event");
        }
    }

    fn note_selected(&self, name: &str) {
        let mut selected = self.selected.lock().unwrap_or_else(PoisonError::into_inner);
        if selected.as_deref() != Some(name) {
            info!(provider = name, previous = ?selected.as_deref(), "context provider selected");
            *selected = Some(name.to_string());
        }
    }

    async fn attempt<T, F, Fut>(&self, entry: &ProviderEntry, call: &F) -> Result<T>
    where
        F: Fn(Arc<dyn ContextProvider>) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T>> + Send,
    {
        if let Some(extended) = entry.provider.as_extended() {
            extended.check_availability().await?;
        }
        call(Arc::clone(&entry.provider)).await
    }

    /// Run `operation` against the candidates in priority order
    async fn invoke<T, F, Fut>(
        &self,
        operation: ContextOperation,
        argument: Option<&str>,
        call: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send,
        F: Fn(Arc<dyn ContextProvider>) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T>> + Send,
    {
        let key = operation.cache_key(argument);
        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get_as::<T>(&key)) {
            debug!(operation = %operation, "priority cache hit");
            return Ok(hit);
        }

        let candidates = self.candidates(operation.required_capability());
        if candidates.is_empty() {
            if self.log_errors {
                error!(operation = %operation, "no context provider offers this operation");
            }
            self.publish(ProviderEvent::AllFailed {
                operation,
                errors: BTreeMap::new(),
            })
            .await;
            return Err(Error::not_supported(operation.as_str()));
        }

        let mut failures: Vec<ProviderFailure> = Vec::with_capacity(candidates.len());
        let mut previous: Option<String> = None;
        for entry in candidates {
            if let Some(from) = previous.take() {
                self.publish(ProviderEvent::ProviderFallback {
                    from,
                    to: entry.name.clone(),
                })
                .await;
            }

            let started = Instant::now();
            let outcome = self.attempt(&entry, &call).await;
            let elapsed = started.elapsed();

            match outcome {
                Ok(value) => {
                    self.metrics.record_success(&entry.name, elapsed);
                    self.note_selected(&entry.name);
                    self.publish(ProviderEvent::ProviderUsed {
                        provider: entry.name.clone(),
                        operation,
                    })
                    .await;
                    if let Some(cache) = &self.cache {
                        if let Err(e) = cache.set_as(key.as_str(), &value) {
                            debug!(operation = %operation, error = %e, "result not cached");
                        }
                    }
                    return Ok(value);
                }
                Err(e) => {
                    self.metrics.record_failure(&entry.name, elapsed, &e);
                    if self.log_errors {
                        warn!(
                            provider = %entry.name,
                            operation = %operation,
                            error = %e,
                            "context provider failed"
                        );
                    }
                    let reason = e.to_string();
                    self.publish(ProviderEvent::ProviderError {
                        provider: entry.name.clone(),
                        error: reason.clone(),
                    })
                    .await;
                    failures.push(ProviderFailure {
                        provider: entry.name.clone(),
                        reason,
                    });
                    previous = Some(entry.name);
                }
            }
        }

        if self.log_errors {
            error!(
                operation = %operation,
                attempts = failures.len(),
                "all context providers failed"
            );
        }
        let errors = failures
            .iter()
            .map(|f| (f.provider.clone(), f.reason.clone()))
            .collect();
        self.publish(ProviderEvent::AllFailed { operation, errors })
            .await;
        Err(Error::all_failed(operation.as_str(), failures))
    }
}

impl std::fmt::Debug for PriorityContextProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityContextProvider")
            .field("name", &self.name)
            .field("providers", &*self.read_entries())
            .field("cache_results", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ContextProvider for PriorityContextProvider {
    async fn get_latest_platform_block_height(&self) -> Result<u64> {
        self.invoke(ContextOperation::LatestPlatformBlockHeight, None, |p| async move {
            p.get_latest_platform_block_height().await
        })
        .await
    }

    async fn get_latest_platform_block_time(&self) -> Result<u64> {
        self.invoke(ContextOperation::LatestPlatformBlockTime, None, |p| async move {
            p.get_latest_platform_block_time().await
        })
        .await
    }

    async fn get_latest_platform_core_chain_locked_height(&self) -> Result<u32> {
        self.invoke(
            ContextOperation::LatestPlatformCoreChainLockedHeight,
            None,
            |p| async move { p.get_latest_platform_core_chain_locked_height().await },
        )
        .await
    }

    async fn get_latest_platform_version(&self) -> Result<String> {
        self.invoke(ContextOperation::LatestPlatformVersion, None, |p| async move {
            p.get_latest_platform_version().await
        })
        .await
    }

    async fn get_proposer_block_count(&self, proposer_id: &str) -> Result<Option<u64>> {
        let id = proposer_id.to_string();
        self.invoke(
            ContextOperation::ProposerBlockCount,
            Some(proposer_id),
            move |p| {
                let id = id.clone();
                async move { p.get_proposer_block_count(&id).await }
            },
        )
        .await
    }

    async fn get_time_per_block_millis(&self) -> Result<u64> {
        self.invoke(ContextOperation::TimePerBlockMillis, None, |p| async move {
            p.get_time_per_block_millis().await
        })
        .await
    }

    async fn get_block_proposer(&self, height: u64) -> Result<Option<String>> {
        let argument = height.to_string();
        self.invoke(
            ContextOperation::BlockProposer,
            Some(&argument),
            move |p| async move { p.get_block_proposer(height).await },
        )
        .await
    }

    async fn get_quorum_keys(&self) -> Result<Option<QuorumMap>> {
        self.invoke(ContextOperation::QuorumKeys, None, |p| async move {
            p.get_quorum_keys().await
        })
        .await
    }

    async fn is_valid(&self) -> bool {
        self.get_active_provider().await.is_some()
    }

    fn as_extended(&self) -> Option<&dyn ExtendedContextProvider> {
        Some(self)
    }
}

#[async_trait]
impl ExtendedContextProvider for PriorityContextProvider {
    fn provider_name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> CapabilitySet {
        self.read_entries()
            .iter()
            .flat_map(ProviderEntry::capabilities)
            .collect()
    }

    async fn is_available(&self) -> bool {
        self.is_valid().await
    }
}
