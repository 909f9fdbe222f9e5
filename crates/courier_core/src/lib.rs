//! Core data types for the Courier outbound HTTP library.
//!
//! This crate provides the request descriptor every provider integration
//! builds and the normalized result every integration gets back.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod descriptor;
mod method;
mod response;

pub use descriptor::{
    RequestBody, RequestDescriptor, RequestDescriptorBuilder, ResponseMode, RetryMutator,
};
pub use method::Method;
pub use response::{Body, Normalized, ResponseEnvelope};
