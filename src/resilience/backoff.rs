//! Exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

use crate::config::SubmitConfig;

/// Bounded retry schedule for transient submission failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Hard cap on attempts; definitive rejections never consume retries.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Delay to sleep before attempt `attempt + 1` (0-based completed
    /// attempt count). Exponential, capped, with up to 10% jitter.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_millis(0);
        }

        let exponential_base = 2u64.saturating_pow(attempt - 1);
        let delay_ms = self.base_delay_ms.saturating_mul(exponential_base);
        let capped = delay_ms.min(self.max_delay_ms);

        let jitter_range = capped / 10;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };

        Duration::from_millis(capped + jitter)
    }

    /// True once `attempt` completed attempts have exhausted the budget.
    pub fn exhausted(&self, attempt: u32) -> bool {
        attempt >= self.max_attempts
    }
}

impl From<&SubmitConfig> for RetryPolicy {
    fn from(config: &SubmitConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay_ms: config.backoff_base_ms,
            max_delay_ms: config.backoff_max_ms,
        }
    }
}
