//! Top-level error wrapper types.

use crate::{BuilderError, ConfigError, HttpError, JsonError, RateLimitError};

/// Every failure a Courier operation can surface.
///
/// # Examples
///
/// ```
/// use courier_error::{CourierError, HttpError};
///
/// let http_err = HttpError::other("Connection failed");
/// let err: CourierError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CourierErrorKind {
    /// Outbound HTTP failure
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Rate limiter error
    #[from(RateLimitError)]
    RateLimit(RateLimitError),
}

/// Courier error with kind discrimination.
///
/// # Examples
///
/// ```
/// use courier_error::{ConfigError, CourierErrorKind, CourierResult};
///
/// fn might_fail() -> CourierResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), CourierErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Courier Error: {}", _0)]
pub struct CourierError(Box<CourierErrorKind>);

impl CourierError {
    /// Create a new error from a kind.
    pub fn new(kind: CourierErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CourierErrorKind {
        &self.0
    }

    /// The HTTP failure underneath, if this is one.
    pub fn as_http(&self) -> Option<&HttpError> {
        match self.kind() {
            CourierErrorKind::Http(err) => Some(err),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to CourierErrorKind
impl<T> From<T> for CourierError
where
    T: Into<CourierErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Courier operations.
pub type CourierResult<T> = std::result::Result<T, CourierError>;
