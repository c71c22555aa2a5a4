//! Cross-origin message protocol
//!
//! Inbound: `{ "type": "request-html-to-json", "options": {...} }`
//! Outbound: `{ "type": "html-to-json-response", "data": ... }` or
//! `{ "type": "html-to-json-error", "error": "..." }`

use composable_core::{ConversionResult, MappingTable};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

pub const REQUEST_TYPE: &str = "request-html-to-json";
pub const RESPONSE_TYPE: &str = "html-to-json-response";
pub const ERROR_TYPE: &str = "html-to-json-error";

/// A message received from another window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub origin: String,
    pub data: Value,
}

impl InboundEvent {
    pub fn new(origin: impl Into<String>, data: Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

/// Options of a conversion request
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    #[serde(default)]
    pub component_mappings: MappingTable,
    /// Bypass the session cache
    #[serde(default)]
    pub refresh: bool,
}

/// A message sent back to the requesting window
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum OutboundMessage<'a> {
    #[serde(rename = "html-to-json-response")]
    Response { data: &'a ConversionResult },
    #[serde(rename = "html-to-json-error")]
    Error { error: String },
}

/// Origins trusted to request conversions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    origins: BTreeSet<String>,
}

impl AllowList {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            origins: origins.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.origins.contains(origin)
    }
}

/// Why an inbound message was ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    OriginNotAllowed(String),
    NotAnObject,
    UnknownType(Option<String>),
    MalformedOptions(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::OriginNotAllowed(origin) => write!(f, "origin {origin} is not allowed"),
            Rejection::NotAnObject => write!(f, "payload is not an object"),
            Rejection::UnknownType(Some(kind)) => write!(f, "unknown message type {kind}"),
            Rejection::UnknownType(None) => write!(f, "message has no type"),
            Rejection::MalformedOptions(reason) => write!(f, "malformed options: {reason}"),
        }
    }
}

/// Checks origin and shape of an inbound message
///
/// # Errors
///
/// Returns the reason the message must be ignored
pub fn validate(event: &InboundEvent, allowed: &AllowList) -> Result<RequestOptions, Rejection> {
    if !allowed.contains(&event.origin) {
        return Err(Rejection::OriginNotAllowed(event.origin.clone()));
    }
    let Value::Object(payload) = &event.data else {
        return Err(Rejection::NotAnObject);
    };
    match payload.get("type").and_then(Value::as_str) {
        Some(REQUEST_TYPE) => {}
        other => return Err(Rejection::UnknownType(other.map(str::to_string))),
    }
    match payload.get("options") {
        None | Some(Value::Null) => Ok(RequestOptions::default()),
        Some(options) => serde_json::from_value(options.clone())
            .map_err(|e| Rejection::MalformedOptions(e.to_string())),
    }
}
