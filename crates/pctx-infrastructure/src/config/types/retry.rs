//! Retry configuration types

use std::time::Duration;

use pctx_providers::constants::{
    RETRY_BACKOFF_FACTOR, RETRY_BASE_DELAY_MS, RETRY_MAX_ATTEMPTS, RETRY_MAX_DELAY_MS,
};
use pctx_providers::retry::RetryPolicy;
use serde::{Deserialize, Serialize};

/// Bounded exponential backoff for transient failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts, the first try included
    pub max_attempts: u32,
    /// Delay before the first retry (ms)
    pub base_delay_ms: u64,
    /// Multiplier applied to the delay after each retry
    pub backoff_factor: f64,
    /// Upper bound of a single delay (ms)
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            base_delay_ms: RETRY_BASE_DELAY_MS,
            backoff_factor: RETRY_BACKOFF_FACTOR,
            max_delay_ms: RETRY_MAX_DELAY_MS,
        }
    }
}

impl RetrySettings {
    /// Build the retry policy described by these settings
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
            .with_backoff_factor(self.backoff_factor)
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
    }
}
