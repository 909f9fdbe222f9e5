//! Outbound request descriptors.

use crate::Method;
use courier_error::{BuilderError, BuilderErrorKind};
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Payload sent with a request.
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum RequestBody {
    /// JSON document, sent with `Content-Type: application/json`
    #[from]
    Json(JsonValue),
    /// URL-encoded form fields
    Form(Vec<(String, String)>),
    /// Raw text, sent as-is
    Text(String),
}

/// How a successful response is handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResponseMode {
    /// Only the parsed body
    #[default]
    Parsed,
    /// Status, headers and parsed body together
    Envelope,
}

type MutatorFn = dyn Fn(&RequestDescriptor) -> Option<RequestDescriptor> + Send + Sync;

/// Hook that may rewrite a request before its single retry.
///
/// Returning `None` keeps the original descriptor; returning `Some` replaces
/// it for the retry attempt only. The hook is never consulted for the first
/// attempt and never more than once per request.
///
/// # Examples
///
/// ```
/// use courier_core::{RequestDescriptor, RetryMutator};
///
/// // Fall back to the free tier when the premium endpoint struggles.
/// let downgrade = RetryMutator::new(|req: &RequestDescriptor| {
///     req.url()
///         .contains("tier=premium")
///         .then(|| req.clone().with_url(req.url().replace("tier=premium", "tier=free")))
/// });
///
/// let req = RequestDescriptor::get("https://api.example.com/forecast?tier=premium")
///     .build()
///     .unwrap();
/// let retried = downgrade.apply(&req).unwrap();
/// assert_eq!(retried.url(), "https://api.example.com/forecast?tier=free");
/// ```
#[derive(Clone)]
pub struct RetryMutator(Arc<MutatorFn>);

impl RetryMutator {
    /// Wrap a closure as a retry mutator.
    pub fn new<F>(mutate: F) -> Self
    where
        F: Fn(&RequestDescriptor) -> Option<RequestDescriptor> + Send + Sync + 'static,
    {
        Self(Arc::new(mutate))
    }

    /// Run the hook against a descriptor.
    pub fn apply(&self, descriptor: &RequestDescriptor) -> Option<RequestDescriptor> {
        (self.0)(descriptor)
    }
}

impl fmt::Debug for RetryMutator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RetryMutator(..)")
    }
}

/// Everything needed to issue one outbound HTTP call.
///
/// Descriptors are immutable once built. The only sanctioned change is the
/// copy a [`RetryMutator`] may produce for the retry attempt.
///
/// # Examples
///
/// ```
/// use courier_core::{Method, RequestDescriptor, ResponseMode};
///
/// let req = RequestDescriptor::builder()
///     .method(Method::Post)
///     .url("https://api.example.com/payments")
///     .header("Authorization", "Bearer token")
///     .body(serde_json::json!({"amount": "10.00"}))
///     .response_mode(ResponseMode::Envelope)
///     .abort_status(404)
///     .build()
///     .unwrap();
///
/// assert_eq!(req.header("authorization"), Some("Bearer token"));
/// assert!(req.is_abort_status(404));
/// assert!(!req.is_abort_status(500));
/// ```
#[derive(Debug, Clone, derive_builder::Builder, derive_getters::Getters)]
#[builder(
    setter(into),
    build_fn(private, name = "build_internal", validate = "Self::validate")
)]
pub struct RequestDescriptor {
    /// HTTP method.
    #[builder(default)]
    method: Method,
    /// Absolute target URL.
    url: String,
    /// Request headers. Names compare case-insensitively.
    #[builder(default, setter(custom))]
    headers: HashMap<String, String>,
    /// Optional payload.
    #[builder(default, setter(strip_option))]
    body: Option<RequestBody>,
    /// Shape of the successful result.
    #[builder(default)]
    response_mode: ResponseMode,
    /// Statuses that end the request quietly with no result.
    #[builder(default, setter(custom))]
    abort_statuses: Vec<u16>,
    /// Hook consulted once before the retry attempt.
    #[builder(default, setter(strip_option))]
    retry_mutator: Option<RetryMutator>,
}

impl RequestDescriptorBuilder {
    /// Add a single header, replacing any previous value for the same name.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let headers = self.headers.get_or_insert_with(HashMap::new);
        headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        headers.insert(name, value.into());
        self
    }

    /// Add several headers at once.
    pub fn headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.header(name, value);
        }
        self
    }

    /// Declare a status that should end the request with no result.
    pub fn abort_status(&mut self, status: u16) -> &mut Self {
        let statuses = self.abort_statuses.get_or_insert_with(Vec::new);
        if !statuses.contains(&status) {
            statuses.push(status);
        }
        self
    }

    /// Declare several abort statuses at once.
    pub fn abort_statuses(&mut self, statuses: impl IntoIterator<Item = u16>) -> &mut Self {
        for status in statuses {
            self.abort_status(status);
        }
        self
    }

    /// Build the descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is missing or blank, or an abort status
    /// is not a valid HTTP status code.
    pub fn build(&self) -> Result<RequestDescriptor, BuilderError> {
        self.build_internal().map_err(|e| match e {
            RequestDescriptorBuilderError::UninitializedField(field) => {
                BuilderError::new(BuilderErrorKind::MissingField(field.to_string()))
            }
            RequestDescriptorBuilderError::ValidationError(reason) => BuilderError::from(reason),
        })
    }

    fn validate(&self) -> Result<(), String> {
        if self.url.as_ref().is_some_and(|url| url.trim().is_empty()) {
            return Err("url must not be blank".to_string());
        }
        let invalid = self
            .abort_statuses
            .iter()
            .flatten()
            .find(|status| !(100..=599).contains(*status));
        if let Some(status) = invalid {
            return Err(format!("abort status {} is not an HTTP status code", status));
        }
        Ok(())
    }
}

impl RequestDescriptor {
    /// Creates a new descriptor builder.
    pub fn builder() -> RequestDescriptorBuilder {
        RequestDescriptorBuilder::default()
    }

    /// Builder preset for a GET request.
    pub fn get(url: impl Into<String>) -> RequestDescriptorBuilder {
        Self::preset(Method::Get, url)
    }

    /// Builder preset for a POST request.
    pub fn post(url: impl Into<String>) -> RequestDescriptorBuilder {
        Self::preset(Method::Post, url)
    }

    /// Builder preset for a PUT request.
    pub fn put(url: impl Into<String>) -> RequestDescriptorBuilder {
        Self::preset(Method::Put, url)
    }

    /// Builder preset for a DELETE request.
    pub fn delete(url: impl Into<String>) -> RequestDescriptorBuilder {
        Self::preset(Method::Delete, url)
    }

    fn preset(method: Method, url: impl Into<String>) -> RequestDescriptorBuilder {
        let mut builder = RequestDescriptorBuilder::default();
        builder.method(method).url(url);
        builder
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Check whether the caller declared this status as an abort status.
    pub fn is_abort_status(&self, status: u16) -> bool {
        self.abort_statuses.contains(&status)
    }

    /// Borrow the descriptor unchanged when `name` is already set, otherwise
    /// return a copy with the header added.
    pub fn with_default_header(&self, name: &str, value: &str) -> Cow<'_, Self> {
        if self.header(name).is_some() {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(self.clone().with_header(name, value))
        }
    }

    /// Copy with a different target URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Copy with a header set, replacing any value under the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Copy with a different payload.
    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Descriptor to use for the retry attempt.
    ///
    /// Consults the retry mutator when one is set; falls back to the
    /// descriptor itself when there is no mutator or it declines to change
    /// anything.
    pub fn for_retry(&self) -> Cow<'_, Self> {
        match self.retry_mutator.as_ref().and_then(|m| m.apply(self)) {
            Some(mutated) => {
                tracing::debug!(
                    from = %self.url,
                    to = %mutated.url,
                    "Retry mutator rewrote request"
                );
                Cow::Owned(mutated)
            }
            None => Cow::Borrowed(self),
        }
    }
}
