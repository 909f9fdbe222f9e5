//! Courier - outbound HTTP core for third-party API integrations
//!
//! Courier is the shared layer underneath thin provider wrappers (weather
//! services, payment and AI APIs, scraped sites). A wrapper builds a
//! [`RequestDescriptor`], hands it to the [`ProviderRegistry`], and reshapes
//! the [`Normalized`] result into its own types.
//!
//! # Features
//!
//! - **Single retry**: timeouts and transient statuses are retried once after a fixed delay
//! - **Abort statuses**: declared statuses end the request quietly with `None`
//! - **Rate limiting**: per-provider concurrency caps, reservoirs and start spacing
//! - **Usage stats**: daily request and error counters per provider
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use courier::{CourierConfig, ProviderRegistry, RequestDescriptor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = ProviderRegistry::from_config(&CourierConfig::load()?)?;
//!
//!     let request = RequestDescriptor::get("https://api.openweathermap.org/data/2.5/weather?q=Utrecht")
//!         .abort_status(404)
//!         .build()?;
//!
//!     if let Some(weather) = registry.request("openweathermap", &request).await? {
//!         println!("{}", weather.to_json());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Courier is organized as a workspace with focused crates:
//!
//! - `courier_error` - Error types
//! - `courier_core` - Request descriptors and normalized results
//! - `courier_rate_limit` - Configuration, provider limits and usage stats
//! - `courier_http` - Transport, execution, retry and the provider registry
//!
//! This crate (`courier`) re-exports everything for convenience.

pub mod telemetry;

pub use courier_core::*;
pub use courier_error::*;
pub use courier_http::*;
pub use courier_rate_limit::*;
