//! Interval-refilled request reservoir.

use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tracing::debug;

/// Token reservoir reset to a fixed amount at every interval boundary.
///
/// Unlike a leaky bucket nothing trickles back between boundaries: the whole
/// refresh amount becomes available at once when an interval ends, replacing
/// whatever was left over.
#[derive(Debug)]
pub(crate) struct Reservoir {
    tokens: u32,
    refresh_amount: u32,
    interval: Duration,
    next_refill: Instant,
}

impl Reservoir {
    pub(crate) fn new(initial: u32, refresh_amount: u32, interval: Duration) -> Self {
        Self {
            tokens: initial,
            refresh_amount,
            interval,
            next_refill: Instant::now() + interval,
        }
    }

    /// Take one token, waiting for the next boundary while the reservoir is empty.
    pub(crate) async fn take(&mut self) {
        loop {
            self.refill(Instant::now());
            if self.tokens > 0 {
                self.tokens -= 1;
                return;
            }
            debug!(
                wait_ms = self
                    .next_refill
                    .saturating_duration_since(Instant::now())
                    .as_millis() as u64,
                "Reservoir depleted, waiting for refill"
            );
            sleep_until(self.next_refill).await;
        }
    }

    fn refill(&mut self, now: Instant) {
        if now < self.next_refill {
            return;
        }
        // Skip over every boundary missed while idle.
        let overdue = now.duration_since(self.next_refill);
        let missed = (overdue.as_nanos() / self.interval.as_nanos()).min(u32::MAX as u128) as u32;
        self.next_refill += self.interval * missed.saturating_add(1);
        self.tokens = self.refresh_amount;
    }
}
