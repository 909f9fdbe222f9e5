//! Single-attempt request execution.

use crate::{ReqwestTransport, Transport, classify_failure, classify_response};
use courier_core::{Body, Normalized, RequestDescriptor, ResponseEnvelope, ResponseMode};
use courier_error::{HttpError, HttpErrorKind, HttpResult};
use courier_rate_limit::TransportConfig;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Issues one request and normalizes what comes back.
///
/// The executor never retries. Any status outside 2xx, and any request
/// that produced no response, comes back as a classified [`HttpError`].
///
/// # Example
///
/// ```rust,no_run
/// use courier_core::RequestDescriptor;
/// use courier_http::RequestExecutor;
/// use courier_rate_limit::TransportConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let executor = RequestExecutor::from_config(&TransportConfig::default())?;
/// let request = RequestDescriptor::get("https://api.example.com/x").build()?;
///
/// let result = executor.execute(&request).await?;
/// println!("{}", result.to_json());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    user_agent: String,
}

impl RequestExecutor {
    /// Create an executor over any transport.
    pub fn new(transport: Arc<dyn Transport>, user_agent: impl Into<String>) -> Self {
        Self {
            transport,
            user_agent: user_agent.into(),
        }
    }

    /// Create an executor over reqwest with the configured timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &TransportConfig) -> HttpResult<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::new(Arc::new(transport), config.user_agent.clone()))
    }

    /// User agent applied to requests without one.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Issue the request once.
    ///
    /// # Errors
    ///
    /// Returns a classified error when the request fails to complete, the
    /// status is outside 2xx, or a body declared as JSON does not parse.
    #[instrument(skip_all, fields(method = %descriptor.method(), url = %descriptor.url()))]
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> HttpResult<Normalized> {
        let request = descriptor.with_default_header("User-Agent", &self.user_agent);

        let response = match self.transport.send(&request).await {
            Ok(response) => response,
            Err(failure) => {
                debug!(error = %failure.message, timed_out = failure.timed_out, "Request failed");
                return Err(HttpError::new(classify_failure(&failure)));
            }
        };

        let status = response.status;
        if !response.is_success() {
            debug!(status, "Request rejected");
            return Err(HttpError::new(classify_response(&response)));
        }

        if status == 204 && response.body.trim().is_empty() {
            return Ok(Normalized::Success);
        }

        let content_type = response.content_type().map(str::to_string);
        let body = Body::parse(content_type.as_deref(), response.body).map_err(|e| {
            HttpError::new(HttpErrorKind::Unclassified {
                status: Some(status),
                message: format!("Response declared JSON but failed to parse: {}", e),
            })
        })?;

        Ok(match descriptor.response_mode() {
            ResponseMode::Parsed => Normalized::Parsed(body),
            ResponseMode::Envelope => {
                Normalized::Envelope(ResponseEnvelope::new(status, response.headers, body))
            }
        })
    }
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}
