//! HTTP error types and failure classification.

/// Classified outbound HTTP failure.
///
/// Every failure the request executor produces falls into exactly one of
/// these buckets. The retry layer decides what to do from the bucket alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum HttpErrorKind {
    /// Network-level timeout, reset or aborted connection
    #[display("Request timed out: {}", _0)]
    Timeout(String),
    /// Server answered with a transient status (429, 5xx and friends)
    #[display("HTTP {} (retryable): {}", status, message)]
    RetryableStatus {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },
    /// Server refused the credentials (401/403)
    #[display("HTTP {} (access denied): {}", status, message)]
    AccessDenied {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },
    /// Anything else
    #[display("{}", message)]
    Unclassified {
        /// HTTP status code, when the server answered at all
        status: Option<u16>,
        /// Error message
        message: String,
    },
}

impl HttpErrorKind {
    /// Status code carried by this failure, if the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpErrorKind::Timeout(_) => None,
            HttpErrorKind::RetryableStatus { status, .. } => Some(*status),
            HttpErrorKind::AccessDenied { status, .. } => Some(*status),
            HttpErrorKind::Unclassified { status, .. } => *status,
        }
    }

    /// Check if this failure qualifies for the single retry.
    ///
    /// Access-denied failures never do, whatever else is true of them.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HttpErrorKind::Timeout(_) | HttpErrorKind::RetryableStatus { .. }
        )
    }
}

/// HTTP error with source location tracking.
///
/// # Examples
///
/// ```
/// use courier_error::{HttpError, HttpErrorKind, RetryableError};
///
/// let err = HttpError::new(HttpErrorKind::RetryableStatus {
///     status: 503,
///     message: "Service unavailable".to_string(),
/// });
/// assert_eq!(err.status(), Some(503));
/// assert!(err.is_retryable());
/// assert!(format!("{}", err).contains("HTTP 503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", kind, line, file)]
pub struct HttpError {
    /// The kind of failure
    pub kind: HttpErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Create a new HttpError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: HttpErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an unclassified failure with no status.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier_error::HttpError;
    ///
    /// let err = HttpError::other("invalid URL");
    /// assert_eq!(err.status(), None);
    /// ```
    #[track_caller]
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(HttpErrorKind::Unclassified {
            status: None,
            message: message.into(),
        })
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HttpErrorKind {
        &self.kind
    }

    /// Status code carried by this failure, if any.
    pub fn status(&self) -> Option<u16> {
        self.kind.status()
    }

    /// True for network-level timeouts.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, HttpErrorKind::Timeout(_))
    }

    /// True for 401/403 responses.
    pub fn is_access_denied(&self) -> bool {
        matches!(self.kind, HttpErrorKind::AccessDenied { .. })
    }
}

/// Trait for errors that support retry logic.
///
/// Transient errors like 503 (service unavailable), 429 (rate limit) or
/// network timeouts return true. Permanent errors like 401 (unauthorized)
/// or 400 (bad request) return false.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for HttpError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Result type for HTTP operations.
pub type HttpResult<T> = std::result::Result<T, HttpError>;
