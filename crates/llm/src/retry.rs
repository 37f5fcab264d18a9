use std::future::Future;
use std::time::Duration;

use postwright_common::{AgentMetadata, AgentResult, PostwrightError, Result};
use serde::{Deserialize, Serialize};
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per call, including the first.
    pub retry_attempts: u32,
    /// Base delay; attempt `n` waits `retry_delay_ms * 2^(n-1)` before the next.
    pub retry_delay_ms: u64,
    /// Upper bound on a single attempt. `None` waits indefinitely.
    pub attempt_timeout_ms: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 3,
            retry_delay_ms: 1000,
            attempt_timeout_ms: Some(120_000),
        }
    }
}

impl RetryConfig {
    /// Delay after failed attempt `attempt` (1-indexed).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u64::MAX);
        Duration::from_millis(self.retry_delay_ms.saturating_mul(factor))
    }
}

/// Runs an async operation with bounded retries and exponential backoff.
///
/// Attempts within one call are strictly sequential. Separate calls share
/// nothing, so agents may use one executor concurrently.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
    model: String,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig, model: impl Into<String>) -> Self {
        Self {
            config,
            model: model.into(),
        }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Invoke `operation` until it succeeds or attempts run out.
    ///
    /// The first success is returned immediately. After the last failure the
    /// result carries `"Failed after N attempts: <last error>"`. A zero
    /// attempt count is treated as one.
    pub async fn execute_with_retry<T, F, Fut>(&self, mut operation: F, context: &str) -> AgentResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let started = Instant::now();
        let attempts = self.config.retry_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.run_attempt(operation()).await {
                Ok(data) => {
                    debug!(context, attempt, "Operation succeeded");
                    return AgentResult::ok(data).with_metadata(self.metadata(started));
                }
                Err(e) => {
                    warn!(
                        context,
                        attempt,
                        max_attempts = attempts,
                        error = %e,
                        "Attempt failed"
                    );
                    last_error = e.to_string();

                    if attempt < attempts {
                        sleep(self.config.backoff_delay(attempt)).await;
                    }
                }
            }
        }

        error!(context, attempts, error = %last_error, "Retries exhausted");
        AgentResult::failure(format!("Failed after {attempts} attempts: {last_error}"))
            .with_metadata(self.metadata(started))
    }

    async fn run_attempt<T, Fut>(&self, attempt: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        match self.config.attempt_timeout_ms {
            Some(ms) => timeout(Duration::from_millis(ms), attempt)
                .await
                .unwrap_or(Err(PostwrightError::Timeout(ms))),
            None => attempt.await,
        }
    }

    fn metadata(&self, started: Instant) -> AgentMetadata {
        AgentMetadata {
            processing_time: started.elapsed().as_millis() as u64,
            model: self.model.clone(),
        }
    }
}
