//! Test utilities for Courier HTTP tests.
//!
//! This module provides a scripted transport and request helpers.

use courier_core::RequestDescriptor;

pub mod mock_transport;

#[allow(unused_imports)]
pub use mock_transport::{MockReply, MockTransport};

/// Helper to create a GET descriptor for a test URL.
#[allow(dead_code)]
pub fn get(url: &str) -> RequestDescriptor {
    RequestDescriptor::get(url)
        .build()
        .expect("Failed to build test request")
}
