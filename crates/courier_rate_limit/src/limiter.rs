//! Rate limiter implementation using a reservoir, start spacing and Tokio Semaphore.
//!
//! This module provides the `RateLimiter` struct which bounds the traffic sent
//! to one remote provider using:
//! - Tokio Semaphore for concurrent request limits
//! - An interval-refilled reservoir for requests per interval
//! - A next-start stamp for the minimum gap between request starts
//!
//! Reservoir and spacing both run on the Tokio clock.
//!
//! Requests over the limits wait in a FIFO queue. Nothing is ever rejected.

use crate::reservoir::Reservoir;
use crate::spacing::Spacing;
use crate::{ProviderLimits, UsageStats};
use chrono::Local;
use courier_error::{RateLimitError, RateLimitErrorKind};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedSemaphorePermit, Semaphore};
use tracing::{debug, instrument};

// Admission state, owned by the queue lock
#[derive(Debug, Default)]
struct Admission {
    reservoir: Option<Reservoir>,
    spacing: Option<Spacing>,
}

/// Rate limiter for one remote provider.
///
/// Each scheduled task goes through admission in arrival order:
/// 1. Wait for a free concurrency slot
/// 2. Take a token from the reservoir, waiting for the next refill if empty
/// 3. Wait out the minimum start spacing
///
/// Then the task runs, holding its concurrency slot until it finishes.
/// Usage statistics are updated as tasks start and fail.
///
/// # Example
///
/// ```rust,no_run
/// use courier_rate_limit::{ProviderLimits, RateLimiter};
/// use courier_error::RateLimitError;
///
/// # async fn example() -> Result<(), RateLimitError> {
/// let limiter = RateLimiter::new("github", &ProviderLimits::concurrent(4))?;
///
/// let answer = limiter
///     .schedule(|| async { Ok::<_, RateLimitError>(42) })
///     .await?;
/// assert_eq!(answer, 42);
/// assert_eq!(*limiter.stats().request_count(), 1);
/// # Ok(())
/// # }
/// ```
pub struct RateLimiter {
    provider: String,
    limits: ProviderLimits,

    // Admission queue. The fair async mutex serializes admission in FIFO order
    // and owns the reservoir and spacing state.
    queue: AsyncMutex<Admission>,

    // Concurrent request semaphore
    concurrency: Arc<Semaphore>,

    stats: Mutex<UsageStats>,
}

impl RateLimiter {
    /// Create a limiter enforcing `limits` for `provider`.
    ///
    /// # Errors
    ///
    /// Returns an error if the limits fail [`ProviderLimits::validate`].
    #[instrument(skip_all, fields(provider = %provider.as_ref()))]
    pub fn new(provider: impl AsRef<str>, limits: &ProviderLimits) -> Result<Self, RateLimitError> {
        let provider = provider.as_ref().to_string();
        limits.validate(&provider)?;

        let reservoir = match (limits.reservoir, limits.refresh_amount(), limits.refresh_interval()) {
            (Some(initial), Some(amount), Some(interval)) => {
                Some(Reservoir::new(initial, amount, interval))
            }
            _ => None,
        };

        let max_concurrent = limits
            .max_concurrent
            .map(|n| n as usize)
            .unwrap_or(Semaphore::MAX_PERMITS);

        let spacing = limits.min_time().map(Spacing::new);

        debug!(
            max_concurrent = ?limits.max_concurrent,
            reservoir = ?limits.reservoir,
            refresh_interval_ms = ?limits.refresh_interval_ms,
            min_time_ms = ?limits.min_time_ms,
            "Creating rate limiter"
        );

        Ok(Self {
            provider,
            limits: limits.clone(),
            queue: AsyncMutex::new(Admission { reservoir, spacing }),
            concurrency: Arc::new(Semaphore::new(max_concurrent)),
            stats: Mutex::new(UsageStats::default()),
        })
    }

    /// Create a limiter that only keeps statistics.
    pub fn unlimited(provider: impl AsRef<str>) -> Self {
        let provider = provider.as_ref().to_string();
        Self {
            provider,
            limits: ProviderLimits::unlimited(),
            queue: AsyncMutex::new(Admission::default()),
            concurrency: Arc::new(Semaphore::new(Semaphore::MAX_PERMITS)),
            stats: Mutex::new(UsageStats::default()),
        }
    }

    /// Provider this limiter guards.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Limits this limiter enforces.
    pub fn limits(&self) -> &ProviderLimits {
        &self.limits
    }

    /// Concurrency slots free right now.
    pub fn available_slots(&self) -> usize {
        self.concurrency.available_permits()
    }

    /// Snapshot of the usage statistics.
    pub fn stats(&self) -> UsageStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the usage statistics, e.g. with counters saved by an earlier run.
    ///
    /// The day rollover applies to restored stats on the next request.
    pub fn restore_stats(&self, stats: UsageStats) {
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner) = stats;
    }

    /// Run `task` once the limits allow it.
    ///
    /// Waits in line behind earlier tasks for this provider, then runs the
    /// task and returns its result unchanged. The request counter goes up
    /// when the task starts and the error counter when it returns an error.
    ///
    /// # Errors
    ///
    /// Returns the task's own error, or a [`RateLimitError`] if the limiter
    /// was closed while the task was waiting.
    #[instrument(skip(self, task), fields(provider = %self.provider))]
    pub async fn schedule<F, Fut, T, E>(&self, task: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<RateLimitError>,
    {
        let _permit = self.admit().await?;

        self.update_stats(|stats| stats.record_request_at(Local::now()));
        debug!("Task admitted");

        let result = task().await;
        if result.is_err() {
            self.update_stats(UsageStats::record_error);
        }
        result
    }

    async fn admit(&self) -> Result<OwnedSemaphorePermit, RateLimitError> {
        let mut admission = self.queue.lock().await;

        // The slot comes first so the reservoir token is spent at the moment
        // the task actually starts.
        let permit = self
            .concurrency
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| RateLimitError::new(RateLimitErrorKind::Closed(self.provider.clone())))?;

        if let Some(reservoir) = admission.reservoir.as_mut() {
            reservoir.take().await;
        }

        if let Some(spacing) = admission.spacing.as_mut() {
            spacing.wait().await;
        }

        Ok(permit)
    }

    fn update_stats(&self, update: impl FnOnce(&mut UsageStats)) {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        update(&mut *stats);
    }
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("provider", &self.provider)
            .field("limits", &self.limits)
            .field("available_slots", &self.available_slots())
            .finish_non_exhaustive()
    }
}
