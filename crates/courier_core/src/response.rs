//! Normalized response types.

use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Parsed response body.
///
/// Providers answer with JSON documents or, for scraped sites, HTML/text.
/// The variant says which one arrived so callers match on it instead of
/// probing an untyped value.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// No content
    Empty,
    /// JSON document
    Json(JsonValue),
    /// Anything that is not JSON (HTML pages, plain text)
    Text(String),
}

impl Body {
    /// Parse a response body.
    ///
    /// Blank text is `Empty`. A JSON content type must hold valid JSON.
    /// Without one, text that happens to parse as JSON is still treated as
    /// JSON and everything else is kept as text.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the content type claims JSON but the
    /// body is not.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier_core::Body;
    ///
    /// let body = Body::parse(Some("application/json"), r#"{"ok":true}"#.to_string()).unwrap();
    /// assert_eq!(body, Body::Json(serde_json::json!({"ok": true})));
    ///
    /// let page = Body::parse(Some("text/html"), "<html></html>".to_string()).unwrap();
    /// assert_eq!(page, Body::Text("<html></html>".to_string()));
    ///
    /// assert_eq!(Body::parse(None, "  ".to_string()).unwrap(), Body::Empty);
    /// ```
    pub fn parse(content_type: Option<&str>, text: String) -> Result<Self, serde_json::Error> {
        if text.trim().is_empty() {
            return Ok(Body::Empty);
        }
        let declared_json = content_type
            .map(|ct| ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(false);
        if declared_json {
            return serde_json::from_str(&text).map(Body::Json);
        }
        Ok(match serde_json::from_str(&text) {
            Ok(value) => Body::Json(value),
            Err(_) => Body::Text(text),
        })
    }

    /// True when the response carried no content.
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    /// The JSON document, if the body was one.
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The raw text, if the body was not JSON.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Full response handed back in [`ResponseMode::Envelope`](crate::ResponseMode::Envelope).
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct ResponseEnvelope {
    /// HTTP status code
    status: u16,
    /// Response headers, names lowercased
    headers: HashMap<String, String>,
    /// Parsed body
    body: Body,
}

impl ResponseEnvelope {
    /// Create an envelope. Header names are lowercased.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Body) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();
        Self {
            status,
            headers,
            body,
        }
    }

    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Take the body out of the envelope.
    pub fn into_body(self) -> Body {
        self.body
    }
}

/// Successful outcome of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Body only
    Parsed(Body),
    /// Status, headers and body
    Envelope(ResponseEnvelope),
    /// 204 with nothing in it
    Success,
}

impl Normalized {
    /// The body, whichever way the result was shaped.
    pub fn body(&self) -> Option<&Body> {
        match self {
            Normalized::Parsed(body) => Some(body),
            Normalized::Envelope(envelope) => Some(envelope.body()),
            Normalized::Success => None,
        }
    }

    /// The JSON document in the body, if there is one.
    pub fn as_json(&self) -> Option<&JsonValue> {
        self.body().and_then(Body::as_json)
    }

    /// Render the result as a single JSON value.
    ///
    /// `Success` becomes `true`, text bodies become strings, empty bodies
    /// become `null`, and envelopes become `{status, headers, body}`.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier_core::{Body, Normalized};
    ///
    /// assert_eq!(Normalized::Success.to_json(), serde_json::json!(true));
    /// assert_eq!(
    ///     Normalized::Parsed(Body::Text("hi".into())).to_json(),
    ///     serde_json::json!("hi")
    /// );
    /// ```
    pub fn to_json(&self) -> JsonValue {
        match self {
            Normalized::Parsed(body) => body_to_json(body),
            Normalized::Envelope(envelope) => serde_json::json!({
                "status": envelope.status(),
                "headers": envelope.headers(),
                "body": body_to_json(envelope.body()),
            }),
            Normalized::Success => JsonValue::Bool(true),
        }
    }
}

fn body_to_json(body: &Body) -> JsonValue {
    match body {
        Body::Empty => JsonValue::Null,
        Body::Json(value) => value.clone(),
        Body::Text(text) => JsonValue::String(text.clone()),
    }
}
