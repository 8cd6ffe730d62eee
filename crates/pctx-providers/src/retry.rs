//! Retry Policy
//!
//! Bounded retry with exponential backoff shared by every single-source
//! provider. Only errors accepted by the policy's predicate are retried; by
//! default that is [`Error::is_transient`], so malformed responses and other
//! validation failures surface immediately.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use pctx_domain::error::{Error, Result};

use crate::constants::{
    RETRY_BACKOFF_FACTOR, RETRY_BASE_DELAY_MS, RETRY_MAX_ATTEMPTS, RETRY_MAX_DELAY_MS,
};

/// Retry policy with exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, the first try included
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Multiplier applied to the delay after each retry
    pub backoff_factor: f64,
    /// Upper bound for a single delay
    pub max_delay: Duration,
    /// Decides whether an error is worth another attempt
    pub retryable: fn(&Error) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(RETRY_BASE_DELAY_MS),
            backoff_factor: RETRY_BACKOFF_FACTOR,
            max_delay: Duration::from_millis(RETRY_MAX_DELAY_MS),
            retryable: Error::is_transient,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default backoff factor and delay cap
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            ..Self::default()
        }
    }

    /// Policy that never retries
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Set the backoff multiplier
    #[must_use]
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Set the delay cap
    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Set the retryable-error predicate
    #[must_use]
    pub fn with_predicate(mut self, retryable: fn(&Error) -> bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Delay before retry number `retry` (1-based)
    ///
    /// `base_delay * backoff_factor^(retry - 1)`, capped at `max_delay`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as f64;
        let max_ms = self.max_delay.as_millis() as f64;

        let mut delay_ms = base_ms;
        for _ in 1..retry.min(32) {
            delay_ms *= self.backoff_factor;
            if delay_ms >= max_ms {
                break;
            }
        }
        Duration::from_millis(delay_ms.min(max_ms).max(0.0) as u64)
    }

    /// Whether `error` on attempt number `attempt` (1-based) should be retried
    pub fn should_retry(&self, error: &Error, attempt: u32) -> bool {
        attempt < self.max_attempts && (self.retryable)(error)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt limit is reached
    #[allow(clippy::cast_possible_truncation)]
    pub async fn execute<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if self.should_retry(&e, attempt) => {
                    let delay = self.delay_for(attempt);
                    debug!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if attempt > 1 {
                        warn!(operation, attempts = attempt, error = %e, "giving up after retries");
                    }
                    return Err(e);
                }
            }
        }
    }
}
