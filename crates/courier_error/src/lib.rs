//! Error types for the Courier library.
//!
//! This crate provides the error types shared by every Courier crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Outbound request failures are classified once, in [`HttpErrorKind`], so
//! the retry layer and the callers agree on what a failure means.
//!
//! # Examples
//!
//! ```
//! use courier_error::{CourierResult, HttpError, HttpErrorKind};
//!
//! fn fetch_data() -> CourierResult<String> {
//!     Err(HttpError::new(HttpErrorKind::Timeout("operation timed out".into())))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod http;
mod json;
mod rate_limit;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{CourierError, CourierErrorKind, CourierResult};
pub use http::{HttpError, HttpErrorKind, HttpResult, RetryableError};
pub use json::JsonError;
pub use rate_limit::{RateLimitError, RateLimitErrorKind};
