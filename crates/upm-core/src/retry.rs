//! Exponential backoff for transient failures
//!
//! Attempt `n` (1-based) that fails transiently is followed by a sleep of
//! `base_delay * 2^(n-1)` plus a random jitter, until `max_attempts` is
//! reached. Non-transient errors are returned immediately.

use crate::clock::Clock;
use crate::config::RetryConfig;
use crate::error::{MapperError, Result};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_jitter: Duration::from_millis(config.max_jitter_ms),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Deterministic part of the delay that follows failed attempt `attempt`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exp)
    }

    fn jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out
    ///
    /// `op` receives the 1-based attempt number. Backoff sleeps race the
    /// cancellation token and yield [`MapperError::Cancelled`] if it fires.
    pub async fn run<T, F, Fut>(
        &self,
        clock: &dyn Clock,
        cancel: &CancellationToken,
        what: &str,
        mut op: F,
    ) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            if cancel.is_cancelled() {
                return Err(MapperError::Cancelled);
            }

            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() || attempt >= self.max_attempts => return Err(e),
                Err(e) => {
                    let delay = self.backoff(attempt) + self.jitter();
                    warn!(
                        what,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient failure, retrying"
                    );

                    tokio::select! {
                        _ = cancel.cancelled() => return Err(MapperError::Cancelled),
                        _ = clock.sleep(delay) => {}
                    }
                    attempt += 1;
                }
            }
        }
    }
}
