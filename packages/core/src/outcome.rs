//! The recorded outcome of one HTTP exchange.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use crate::error::NavError;
use crate::method::Method;

/// Response headers: lowercase name → values in arrival order.
pub type HeaderMultimap = BTreeMap<String, Vec<String>>;

/// What was read from the response after the status line.
///
/// A success body and an error text are mutually exclusive; a `204 No
/// Content` response carries neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Empty,
    Body(Vec<u8>),
    Error(String),
}

/// One request/response exchange as recorded in the [`History`](crate::History).
///
/// Outcomes are built by an [`Execute`](crate::Execute) implementation and
/// are read-only once handed back: every field is exposed through an
/// accessor only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    method: Method,
    uri: String,
    status: u16,
    status_message: String,
    headers: HeaderMultimap,
    payload: Payload,
}

impl Outcome {
    /// Start an outcome with no payload. Attach one with [`with_body`] or
    /// [`with_error_body`].
    ///
    /// [`with_body`]: Outcome::with_body
    /// [`with_error_body`]: Outcome::with_error_body
    pub fn new(
        method: Method,
        uri: impl Into<String>,
        status: u16,
        status_message: impl Into<String>,
        headers: HeaderMultimap,
    ) -> Self {
        Self {
            method,
            uri: uri.into(),
            status,
            status_message: status_message.into(),
            headers,
            payload: Payload::Empty,
        }
    }

    /// Set the success body, replacing any error text.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.payload = Payload::Body(body.into());
        self
    }

    /// Set the error text, replacing any success body.
    pub fn with_error_body(mut self, text: impl Into<String>) -> Self {
        self.payload = Payload::Error(text.into());
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The URI the request was sent to, before query parameters were appended.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &HeaderMultimap {
        &self.headers
    }

    /// First value of the header `name`, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn response_body(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Body(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn error_body(&self) -> Option<&str> {
        match &self.payload {
            Payload::Error(text) => Some(text),
            _ => None,
        }
    }

    /// The success body as UTF-8, or `None` when absent or not valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        self.response_body()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Decode the success body as JSON into `T`.
    ///
    /// Fails with [`NavError::Schema`] when there is no body or it does not
    /// decode.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, NavError> {
        let bytes = self
            .response_body()
            .ok_or_else(|| NavError::schema("cannot decode the response payload since it is empty"))?;
        serde_json::from_slice(bytes)
            .map_err(|e| NavError::schema(format!("response payload is not the expected JSON: {e}")))
    }
}
