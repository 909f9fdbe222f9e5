//! Minimum gap between request starts.

use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tracing::debug;

/// Holds each start back until `min_time` after the previous one.
#[derive(Debug)]
pub(crate) struct Spacing {
    min_time: Duration,
    next_start: Option<Instant>,
}

impl Spacing {
    pub(crate) fn new(min_time: Duration) -> Self {
        Self {
            min_time,
            next_start: None,
        }
    }

    /// Wait for the earliest allowed start, then claim it.
    pub(crate) async fn wait(&mut self) {
        if let Some(next_start) = self.next_start {
            let now = Instant::now();
            if next_start > now {
                debug!(
                    wait_ms = (next_start - now).as_millis() as u64,
                    "Spacing out request start"
                );
                sleep_until(next_start).await;
            }
        }
        self.next_start = Some(Instant::now() + self.min_time);
    }
}
