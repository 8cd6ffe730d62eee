use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-provider counters kept by a composing provider
///
/// `success_count` and `error_count` only grow. `last_error` and
/// `last_success_time` are overwritten by the most recent attempt of the
/// matching kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderMetrics {
    /// Number of successful attempts
    pub success_count: u64,
    /// Number of failed attempts
    pub error_count: u64,
    /// Mean duration over every timed attempt (milliseconds)
    pub average_response_time_ms: f64,
    /// Rendered error of the most recent failure
    pub last_error: Option<String>,
    /// Time of the most recent success
    pub last_success_time: Option<DateTime<Utc>>,
}

impl ProviderMetrics {
    /// Total number of timed attempts
    pub fn total_attempts(&self) -> u64 {
        self.success_count + self.error_count
    }

    /// Fraction of attempts that succeeded, or `None` before the first attempt
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> Option<f64> {
        let total = self.total_attempts();
        if total == 0 {
            None
        } else {
            Some(self.success_count as f64 / total as f64)
        }
    }
}
