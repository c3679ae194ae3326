use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::ClassifiedError;

/// Delay shape between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// delay = base_delay * attempt
    #[default]
    Linear,
    /// delay = base_delay * 2^attempt
    Exponential,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Bounded retry policy with a per-attempt timeout and capped backoff.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Time budget for a single attempt.
    pub attempt_timeout: Duration,
    /// Base delay for backoff.
    pub base_delay: Duration,
    /// Upper bound on backoff delay.
    pub max_delay: Duration,
    /// Backoff shape.
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(30),
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff: Backoff::Linear,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after attempt `attempt` has failed (1-based), before the
    /// next one. Grows with the attempt number, capped at `max_delay`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let raw = match self.backoff {
            Backoff::Linear => self.base_delay.saturating_mul(attempt),
            Backoff::Exponential => {
                // base * 2^attempt, shift capped so it cannot overflow.
                self.base_delay.saturating_mul(1u32 << attempt.min(16))
            }
        };
        raw.min(self.max_delay)
    }

    /// Decide whether to retry after a failed attempt.
    ///
    /// `attempt` is 1-based (1 = first attempt). Returns `RetryDecision::NoRetry`
    /// when the error is terminal or the attempt budget is spent.
    pub fn decide(&self, attempt: u32, err: &ClassifiedError) -> RetryDecision {
        if !err.retryable || attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.delay_after(attempt))
    }
}
