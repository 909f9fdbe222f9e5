//! Mapping raw failures onto [`HttpErrorKind`].

use crate::{RawResponse, TransportFailure};
use courier_error::HttpErrorKind;

/// Statuses worth a second attempt.
pub const RETRYABLE_STATUSES: [u16; 8] = [405, 429, 500, 502, 503, 504, 520, 597];

/// Statuses that mean the credentials were refused.
pub const ACCESS_DENIED_STATUSES: [u16; 2] = [401, 403];

// Lowercased fragments of connection-level failure messages.
const TRANSIENT_MARKERS: [&str; 7] = [
    "econnreset",
    "connection reset",
    "econnaborted",
    "aborted",
    "etimedout",
    "timed out",
    "timeout",
];

const MAX_MESSAGE_LEN: usize = 512;

/// Classify a response whose status is outside 2xx.
///
/// # Examples
///
/// ```
/// use courier_error::HttpErrorKind;
/// use courier_http::{RawResponse, classify_response};
///
/// let kind = classify_response(&RawResponse::new(503, "try later"));
/// assert!(matches!(kind, HttpErrorKind::RetryableStatus { status: 503, .. }));
///
/// let kind = classify_response(&RawResponse::new(403, ""));
/// assert!(matches!(kind, HttpErrorKind::AccessDenied { status: 403, .. }));
/// ```
pub fn classify_response(response: &RawResponse) -> HttpErrorKind {
    let status = response.status;
    let message = describe(status, &response.body);

    if ACCESS_DENIED_STATUSES.contains(&status) {
        HttpErrorKind::AccessDenied { status, message }
    } else if RETRYABLE_STATUSES.contains(&status) {
        HttpErrorKind::RetryableStatus { status, message }
    } else {
        HttpErrorKind::Unclassified {
            status: Some(status),
            message,
        }
    }
}

/// Classify a request that never got a response.
pub fn classify_failure(failure: &TransportFailure) -> HttpErrorKind {
    let lowered = failure.message.to_ascii_lowercase();
    if failure.timed_out || TRANSIENT_MARKERS.iter().any(|m| lowered.contains(m)) {
        HttpErrorKind::Timeout(failure.message.clone())
    } else {
        HttpErrorKind::Unclassified {
            status: None,
            message: failure.message.clone(),
        }
    }
}

fn describe(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("no response body")
            .to_string();
    }
    match body.char_indices().nth(MAX_MESSAGE_LEN) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
