//! Outbound request pipeline for the Courier library.
//!
//! A request passes through three layers:
//! - [`ProviderRegistry`] picks the provider's [`RateLimiter`](courier_rate_limit::RateLimiter)
//! - [`RetryPolicy`] retries a transient failure once
//! - [`RequestExecutor`] sends it over a [`Transport`] and normalizes the answer
//!
//! # Example
//!
//! ```rust,no_run
//! use courier_core::RequestDescriptor;
//! use courier_http::ProviderRegistry;
//! use courier_rate_limit::CourierConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ProviderRegistry::from_config(&CourierConfig::load()?)?;
//! let request = RequestDescriptor::get("https://api.weatherapi.com/v1/current.json?q=Amsterdam")
//!     .build()?;
//! let weather = registry.request("weatherapi", &request).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod executor;
mod registry;
mod retry;
mod transport;

pub use classify::{
    ACCESS_DENIED_STATUSES, RETRYABLE_STATUSES, classify_failure, classify_response,
};
pub use executor::RequestExecutor;
pub use registry::ProviderRegistry;
pub use retry::RetryPolicy;
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportFailure};
