//! One fixed-delay retry around the request executor.

use crate::RequestExecutor;
use courier_core::{Normalized, RequestDescriptor};
use courier_error::{HttpResult, RetryableError};
use courier_rate_limit::RetryConfig;
use std::borrow::Cow;
use std::time::Duration;
use tokio_retry2::strategy::FixedInterval;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, info, instrument, warn};

/// Retries a transient failure exactly once after a fixed pause.
///
/// Outcomes of [`execute`](Self::execute):
/// - status in the descriptor's abort list: `Ok(None)`, never retried
/// - timeout or retryable status: wait, run the retry mutator, try again once
/// - access denied or anything unclassified: the error, right away
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    executor: RequestExecutor,
    delay: Duration,
}

impl RetryPolicy {
    /// Wrap an executor, pausing `delay` before the retry.
    pub fn new(executor: RequestExecutor, delay: Duration) -> Self {
        Self { executor, delay }
    }

    /// Wrap an executor with the configured delay.
    pub fn from_config(executor: RequestExecutor, config: &RetryConfig) -> Self {
        Self::new(executor, config.delay())
    }

    /// The wrapped executor.
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Pause before the retry.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Execute the request, retrying once if the first failure is transient.
    ///
    /// # Errors
    ///
    /// Returns the first attempt's error when it is not retryable, or the
    /// retry's error when both attempts fail.
    #[instrument(skip_all, fields(url = %descriptor.url()))]
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> HttpResult<Option<Normalized>> {
        let strategy = FixedInterval::new(self.delay).take(1);
        let mut attempt = 0u32;

        Retry::spawn(strategy, || {
            attempt += 1;
            let current = attempt;
            async move {
                let request = if current == 1 {
                    Cow::Borrowed(descriptor)
                } else {
                    descriptor.for_retry()
                };

                match self.executor.execute(&request).await {
                    Ok(result) => {
                        if current > 1 {
                            info!("First attempt failed, retry succeeded");
                        }
                        Ok(Some(result))
                    }
                    Err(err) if err.status().is_some_and(|s| descriptor.is_abort_status(s)) => {
                        debug!(status = ?err.status(), attempt = current, "Aborted by status");
                        Ok(None)
                    }
                    Err(err) if current > 1 => {
                        warn!(error = %err, "Both attempts failed");
                        Err(RetryError::Permanent(err))
                    }
                    Err(err) if err.is_retryable() => {
                        warn!(
                            error = %err,
                            delay_ms = self.delay.as_millis() as u64,
                            "Transient failure, retrying once"
                        );
                        Err(RetryError::Transient {
                            err,
                            retry_after: None,
                        })
                    }
                    Err(err) => {
                        warn!(error = %err, "Permanent failure, not retrying");
                        Err(RetryError::Permanent(err))
                    }
                }
            }
        })
        .await
    }
}
