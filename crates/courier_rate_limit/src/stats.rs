//! Per-provider usage statistics.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Request and error counters for one provider.
///
/// Counters cover the current calendar day. The day boundary is noticed
/// lazily: the first request recorded on a new day resets both counters
/// before counting itself.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Local};
/// use courier_rate_limit::UsageStats;
///
/// let yesterday = Local::now() - Duration::days(1);
/// let mut stats = UsageStats::new(41, 3, Some(yesterday));
///
/// stats.record_request_at(Local::now());
/// assert_eq!(*stats.request_count(), 1);
/// assert_eq!(*stats.error_count(), 0);
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct UsageStats {
    /// Requests started today
    request_count: u64,
    /// Requests that failed today
    error_count: u64,
    /// Start time of the most recent request
    last_request: Option<DateTime<Local>>,
}

impl UsageStats {
    /// Create stats from previously recorded values.
    pub fn new(request_count: u64, error_count: u64, last_request: Option<DateTime<Local>>) -> Self {
        Self {
            request_count,
            error_count,
            last_request,
        }
    }

    /// Count a request starting at `now`, rolling the counters over first if
    /// the previous request was on another day.
    pub fn record_request_at(&mut self, now: DateTime<Local>) {
        if self
            .last_request
            .is_some_and(|last| last.date_naive() != now.date_naive())
        {
            tracing::debug!(
                previous_requests = self.request_count,
                previous_errors = self.error_count,
                "New day, resetting usage counters"
            );
            self.request_count = 0;
            self.error_count = 0;
        }
        self.request_count += 1;
        self.last_request = Some(now);
    }

    /// Count a failed request.
    pub fn record_error(&mut self) {
        self.error_count += 1;
    }
}
