//! Scripted transport for testing.

use async_trait::async_trait;
use courier_core::RequestDescriptor;
use courier_http::{RawResponse, Transport, TransportFailure};
use std::sync::{Arc, Mutex};

/// A single scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Response(RawResponse),
    Failure(TransportFailure),
}

impl MockReply {
    /// A response with a JSON content type.
    pub fn json(status: u16, body: &str) -> Self {
        Self::Response(RawResponse::new(status, body).with_header("Content-Type", "application/json"))
    }

    /// A response with no content type.
    pub fn status(status: u16, body: &str) -> Self {
        Self::Response(RawResponse::new(status, body))
    }

    /// A connection-level failure.
    pub fn failure(message: &str) -> Self {
        Self::Failure(TransportFailure::new(message))
    }
}

/// Transport that replays a fixed sequence of replies.
///
/// Once the script runs out the last reply repeats. Every request sent is
/// recorded so tests can inspect exactly what went over the "wire".
#[derive(Clone)]
pub struct MockTransport {
    script: Arc<Vec<MockReply>>,
    sent: Arc<Mutex<Vec<RequestDescriptor>>>,
}

impl MockTransport {
    /// Create a transport replaying `script`.
    pub fn new(script: Vec<MockReply>) -> Self {
        assert!(!script.is_empty(), "script needs at least one reply");
        Self {
            script: Arc::new(script),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of times send() was called.
    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Every request sent so far, in order.
    pub fn sent(&self) -> Vec<RequestDescriptor> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportFailure> {
        let index = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(request.clone());
            (sent.len() - 1).min(self.script.len() - 1)
        };
        match &self.script[index] {
            MockReply::Response(response) => Ok(response.clone()),
            MockReply::Failure(failure) => Err(failure.clone()),
        }
    }
}
