//! Rate limiter error types.

/// Error kinds for rate limiting operations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum RateLimitErrorKind {
    /// Limits that cannot be enforced as written
    #[display("Invalid limits for provider '{}': {}", provider, reason)]
    InvalidLimits {
        /// Provider the limits belong to
        provider: String,
        /// What is wrong with them
        reason: String,
    },
    /// The limiter's concurrency slots were closed
    #[display("Rate limiter for provider '{}' is closed", _0)]
    Closed(String),
}

/// Rate limiting error with location tracking.
///
/// # Examples
///
/// ```
/// use courier_error::{RateLimitError, RateLimitErrorKind};
///
/// let err = RateLimitError::new(RateLimitErrorKind::Closed("github".to_string()));
/// assert!(format!("{}", err).contains("github"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Rate Limit Error: {} at line {} in {}", kind, line, file)]
pub struct RateLimitError {
    kind: RateLimitErrorKind,
    line: u32,
    file: &'static str,
}

impl RateLimitError {
    /// Create a new rate limiting error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RateLimitErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RateLimitErrorKind {
        &self.kind
    }
}
