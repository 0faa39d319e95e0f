//! Timeout, retry and cancellation policy for data source calls

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::error::{DashboardError, DashboardResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// Per-attempt timeout
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
            timeout: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// A single attempt under the given timeout
    pub fn once(timeout: Duration) -> Self {
        Self {
            max_attempts: 1,
            timeout,
            ..Default::default()
        }
    }

    /// Delay after the given failed attempt: doubles each time, capped
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Runs `call` until it succeeds, fails with a non-retryable error, or
    /// attempts run out. Cancellation wins over any pending attempt or
    /// backoff and yields `Cancelled`.
    pub async fn run<T, F, Fut>(
        &self,
        operation: &str,
        cancel: &CancellationToken,
        mut call: F,
    ) -> DashboardResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DashboardResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(DashboardError::Cancelled(operation.to_string()));
                }
                result = tokio::time::timeout(self.timeout, call()) => match result {
                    Ok(outcome) => outcome,
                    Err(_) => Err(DashboardError::Timeout {
                        operation: operation.to_string(),
                        after: self.timeout,
                    }),
                },
            };

            let err = match outcome {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_retryable() {
                return Err(err);
            }
            if attempt >= max_attempts {
                error!(operation, attempts = attempt, error = %err, "giving up after retries");
                return Err(err);
            }

            let delay = self.backoff_for(attempt);
            warn!(operation, attempt, max_attempts, ?delay, error = %err, "retrying");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(DashboardError::Cancelled(operation.to_string()));
                }
                _ = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }
}
