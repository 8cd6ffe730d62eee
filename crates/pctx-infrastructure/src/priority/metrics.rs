//! Per-provider attempt metrics
//!
//! Tracks success and failure counts, the running mean response time over
//! every attempt, and the most recent error and success time.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use pctx_domain::error::Error;
use pctx_domain::value_objects::ProviderMetrics;

/// In-memory metrics recorder keyed by provider name
///
/// Readers always receive copies; nothing hands out references into the
/// live map.
#[derive(Debug, Default)]
pub struct ProviderMetricsRecorder {
    metrics: DashMap<String, ProviderMetrics>,
}

impl ProviderMetricsRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `provider` appears in snapshots before its first attempt
    pub fn register(&self, provider: &str) {
        self.metrics.entry(provider.to_string()).or_default();
    }

    /// Record a successful attempt that took `elapsed`
    pub fn record_success(&self, provider: &str, elapsed: Duration) {
        let mut entry = self.metrics.entry(provider.to_string()).or_default();
        entry.success_count += 1;
        entry.last_success_time = Some(Utc::now());
        update_mean(&mut entry, elapsed);
    }

    /// Record a failed attempt that took `elapsed`
    pub fn record_failure(&self, provider: &str, elapsed: Duration, error: &Error) {
        let mut entry = self.metrics.entry(provider.to_string()).or_default();
        entry.error_count += 1;
        entry.last_error = Some(error.to_string());
        update_mean(&mut entry, elapsed);
    }

    /// Metrics of one provider
    pub fn get(&self, provider: &str) -> Option<ProviderMetrics> {
        self.metrics.get(provider).map(|entry| entry.value().clone())
    }

    /// Copy of every provider's metrics
    pub fn snapshot(&self) -> BTreeMap<String, ProviderMetrics> {
        self.metrics
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Forget a provider
    pub fn remove(&self, provider: &str) {
        self.metrics.remove(provider);
    }
}

/// Fold one more sample into the running mean; counts must already include it
#[allow(clippy::cast_precision_loss)]
fn update_mean(metrics: &mut ProviderMetrics, elapsed: Duration) {
    let sample = elapsed.as_secs_f64() * 1000.0;
    let n = metrics.total_attempts() as f64;
    metrics.average_response_time_ms += (sample - metrics.average_response_time_ms) / n;
}
