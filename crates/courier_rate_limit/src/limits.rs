//! Per-provider throughput limits.

use courier_error::{RateLimitError, RateLimitErrorKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits enforced for one remote provider.
///
/// All fields are optional, where `None` means unlimited.
///
/// # Example
///
/// ```toml
/// [providers.bunq]
/// max_concurrent = 1
/// reservoir = 3                # 3 requests...
/// refresh_interval_ms = 3_000  # ...per 3 seconds
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ProviderLimits {
    /// Maximum requests in flight at once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,

    /// Requests allowed before the first refill
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservoir: Option<u32>,

    /// Value the reservoir is reset to at every refill (defaults to `reservoir`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_amount: Option<u32>,

    /// Length of one refill interval in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval_ms: Option<u64>,

    /// Minimum gap between two request starts in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_time_ms: Option<u64>,
}

impl ProviderLimits {
    /// Limits that never hold a request back.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Limits with only a concurrency cap.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier_rate_limit::ProviderLimits;
    ///
    /// let limits = ProviderLimits::concurrent(2).with_reservoir(10, 1_000);
    /// assert_eq!(limits.max_concurrent, Some(2));
    /// assert_eq!(limits.refresh_amount(), Some(10));
    /// ```
    pub fn concurrent(max_concurrent: u32) -> Self {
        Self {
            max_concurrent: Some(max_concurrent),
            ..Self::default()
        }
    }

    /// Add a reservoir of `amount` requests refilled every `interval_ms`.
    pub fn with_reservoir(mut self, amount: u32, interval_ms: u64) -> Self {
        self.reservoir = Some(amount);
        self.refresh_interval_ms = Some(interval_ms);
        self
    }

    /// Add a minimum gap between request starts.
    pub fn with_min_time(mut self, min_time_ms: u64) -> Self {
        self.min_time_ms = Some(min_time_ms);
        self
    }

    /// Value the reservoir is reset to at each refill.
    pub fn refresh_amount(&self) -> Option<u32> {
        self.refresh_amount.or(self.reservoir)
    }

    /// Refill interval as a duration.
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval_ms.map(Duration::from_millis)
    }

    /// Start spacing as a duration.
    pub fn min_time(&self) -> Option<Duration> {
        self.min_time_ms.map(Duration::from_millis)
    }

    /// True when no limit is configured at all.
    pub fn is_unlimited(&self) -> bool {
        self.max_concurrent.is_none() && self.reservoir.is_none() && self.min_time_ms.is_none()
    }

    /// Check that the limits can be enforced.
    ///
    /// # Errors
    ///
    /// Returns an error if a limit is zero, or a reservoir is configured
    /// without a refresh interval (or the other way round).
    pub fn validate(&self, provider: &str) -> Result<(), RateLimitError> {
        let invalid = |reason: &str| {
            RateLimitError::new(RateLimitErrorKind::InvalidLimits {
                provider: provider.to_string(),
                reason: reason.to_string(),
            })
        };

        if self.max_concurrent == Some(0) {
            return Err(invalid("max_concurrent must be at least 1"));
        }
        if self.refresh_interval_ms == Some(0) {
            return Err(invalid("refresh_interval_ms must be at least 1"));
        }
        if self.min_time_ms == Some(0) {
            return Err(invalid("min_time_ms must be at least 1"));
        }
        if self.refresh_amount() == Some(0) {
            return Err(invalid("reservoir refresh amount must be at least 1"));
        }
        match (self.reservoir, self.refresh_interval_ms) {
            (Some(_), None) => return Err(invalid("reservoir requires refresh_interval_ms")),
            (None, Some(_)) => return Err(invalid("refresh_interval_ms requires reservoir")),
            _ => {}
        }
        if self.refresh_amount.is_some() && self.reservoir.is_none() {
            return Err(invalid("refresh_amount requires reservoir"));
        }
        Ok(())
    }
}
