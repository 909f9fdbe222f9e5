//! Per-provider rate limiting and configuration.
//!
//! Each remote provider gets its own [`RateLimiter`] built from
//! [`ProviderLimits`]. Requests beyond the limits queue in arrival order
//! and are never rejected.
//!
//! ## Limits
//!
//! - `max_concurrent` - requests in flight at once
//! - `reservoir` / `refresh_interval_ms` - requests per interval, reset wholesale
//! - `min_time_ms` - minimum gap between request starts
//!
//! Limits are usually read from `courier.toml` through [`CourierConfig`].

mod config;
mod limiter;
mod limits;
mod reservoir;
mod spacing;
mod stats;

pub use config::{CourierConfig, RetryConfig, TransportConfig, default_user_agent};
pub use limiter::RateLimiter;
pub use limits::ProviderLimits;
pub use stats::UsageStats;
