//! HTTP request methods.

use serde::{Deserialize, Serialize};

/// HTTP method of an outbound request.
///
/// # Examples
///
/// ```
/// use courier_core::Method;
/// use std::str::FromStr;
///
/// assert_eq!(Method::from_str("post").unwrap(), Method::Post);
/// assert_eq!(Method::Delete.to_string(), "DELETE");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}
