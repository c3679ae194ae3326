//! Resilient request execution: bounded retry with pre-flight checks and a
//! per-attempt timeout.
//!
//! The executor owns no long-lived state of its own beyond the injected
//! connectivity monitor and policy; each `execute` call has its own attempt
//! counter and timer, so concurrent calls do not interact.

use std::future::Future;
use std::sync::Arc;

use tokio::time;
use url::Url;

use crate::connectivity::ConnectivityMonitor;
use crate::retry::{classify, ClassifiedError, RequestError, RetryDecision, RetryPolicy};

/// Executes fallible network operations under a retry policy.
pub struct Executor {
    monitor: Arc<ConnectivityMonitor>,
    policy: RetryPolicy,
}

impl Executor {
    pub fn new(monitor: Arc<ConnectivityMonitor>, policy: RetryPolicy) -> Self {
        Self { monitor, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `op` until it succeeds or the policy gives up, returning the result
    /// or a single classified error. `op` is re-invoked from scratch on each
    /// attempt and must be safe to call multiple times.
    ///
    /// `url` identifies the target: it is validated once up front and carried
    /// on every log event. Attempts are strictly sequential; a new attempt
    /// never starts before the previous one has settled.
    pub async fn execute<T, F, Fut>(&self, url: &str, mut op: F) -> Result<T, ClassifiedError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RequestError>>,
    {
        if !self.monitor.is_online() {
            tracing::warn!(url, "request skipped: offline before first attempt");
            return Err(ClassifiedError::offline());
        }
        validate_url(url)?;

        let mut attempt = 1u32;
        loop {
            let outcome = match time::timeout(self.policy.attempt_timeout, op()).await {
                Ok(Ok(value)) => {
                    tracing::debug!(url, attempt, "attempt succeeded");
                    return Ok(value);
                }
                Ok(Err(raw)) => classify(&raw),
                // The timer won the race. The attempt future has been dropped,
                // so a late completion cannot settle this attempt a second
                // time.
                Err(_) => ClassifiedError::attempt_timed_out(self.policy.attempt_timeout),
            };

            // A transport failure while the monitor reports offline is not
            // worth the remaining attempts.
            let outcome = if outcome.retryable && !self.monitor.is_online() {
                ClassifiedError::offline()
            } else {
                outcome
            };

            match self.policy.decide(attempt, &outcome) {
                RetryDecision::RetryAfter(delay) => {
                    tracing::debug!(
                        url,
                        attempt,
                        error = %outcome,
                        delay_ms = delay.as_millis() as u64,
                        "retryable failure, backing off"
                    );
                    time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::NoRetry if outcome.retryable => {
                    // Attempt budget spent on retryable failures.
                    tracing::warn!(url, attempt, error = %outcome, "giving up after final attempt");
                    return Err(ClassifiedError::max_retries_exceeded(attempt, &outcome));
                }
                RetryDecision::NoRetry => {
                    tracing::warn!(url, attempt, error = %outcome, "terminal failure");
                    return Err(outcome);
                }
            }
        }
    }
}

/// Static precondition, checked once before the attempt loop.
fn validate_url(url: &str) -> Result<(), ClassifiedError> {
    let parsed = Url::parse(url)
        .map_err(|e| ClassifiedError::invalid_url(&format!("{:?}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ClassifiedError::invalid_url(&format!(
            "{:?}: unsupported scheme {:?}",
            url, other
        ))),
    }
}
