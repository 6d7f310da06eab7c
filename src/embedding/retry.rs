//! Retry with exponential backoff for provider calls.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::constants::{DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BASE_DELAY};

use super::error::{EmbeddingError, ProviderError};

/// How many times to call the provider and how long to wait in between.
///
/// Attempt `n` (1-based) that fails transiently is followed by a sleep of
/// `base_delay * 2^(n-1)`: 300ms, 600ms, 1200ms… with the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Default: `3`.
    pub max_attempts: u32,
    /// Delay after the first failed attempt. Default: 300ms.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_ATTEMPTS,
            base_delay: DEFAULT_RETRY_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Backoff to sleep after failed attempt `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }

    /// Runs `op` until it succeeds, fails permanently, or attempts run out.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, EmbeddingError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let err = match op(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(label, attempt, "Provider call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if !err.is_retriable() {
                debug!(label, attempt, error = %err, "Permanent provider error, not retrying");
                return Err(EmbeddingError::Provider {
                    attempts: attempt,
                    source: err,
                });
            }

            if attempt >= max_attempts {
                warn!(label, attempts = attempt, error = %err, "Provider retries exhausted");
                return Err(EmbeddingError::Provider {
                    attempts: attempt,
                    source: err,
                });
            }

            let delay = self.delay_for_attempt(attempt);
            warn!(
                label,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Transient provider error, backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
