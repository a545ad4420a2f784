//! The failure taxonomy shared by every navigation component.
//!
//! All operations return [`NavError`]. Callers branch on [`NavError::kind`]
//! rather than matching on message text; the variant itself carries the
//! context that was available when the failure was detected.

use thiserror::Error;

use crate::outcome::Outcome;

/// Discriminant of a [`NavError`], convenient for `match` arms and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Connection or I/O failure before a response status was obtained.
    Transport,
    /// Non-2xx response while request errors are enabled.
    Request,
    /// Payload is absent, not JSON, or does not have the expected shape.
    Schema,
    /// No advertised link carries the requested relation.
    RelationNotFound,
    /// No collection entry matches the selector.
    ItemNotFound,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::Request => write!(f, "request"),
            ErrorKind::Schema => write!(f, "schema"),
            ErrorKind::RelationNotFound => write!(f, "relation_not_found"),
            ErrorKind::ItemNotFound => write!(f, "item_not_found"),
        }
    }
}

/// Errors returned by request execution, link resolution, and item selection.
#[derive(Debug, Error)]
pub enum NavError {
    /// The transport failed before a status code was read (DNS, connect,
    /// socket, or body read failure).
    #[error("transport error for {uri}: {message}")]
    Transport { uri: String, message: String },

    /// The server answered with a non-2xx status. The boxed [`Outcome`]
    /// holds the status, headers, and error text read from the response.
    #[error("the request '{} {}' resulted in status {}", .0.method(), .0.uri(), .0.status())]
    Request(Box<Outcome>),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("the current response does not advertise the relation {relation:?}")]
    RelationNotFound { relation: String },

    #[error("no item where {key:?} equals {value:?}")]
    ItemNotFound { key: String, value: String },
}

impl NavError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NavError::Transport { .. } => ErrorKind::Transport,
            NavError::Request(_) => ErrorKind::Request,
            NavError::Schema(_) => ErrorKind::Schema,
            NavError::RelationNotFound { .. } => ErrorKind::RelationNotFound,
            NavError::ItemNotFound { .. } => ErrorKind::ItemNotFound,
        }
    }

    /// The HTTP status a server relaying this failure should answer with.
    ///
    /// | Kind | Status |
    /// |------|--------|
    /// | `Transport` | 502 |
    /// | `Request` | status of the failed response |
    /// | `Schema` | 500 |
    /// | `RelationNotFound` | 409 |
    /// | `ItemNotFound` | 404 |
    pub fn suggested_status(&self) -> u16 {
        match self {
            NavError::Transport { .. } => 502,
            NavError::Request(outcome) => outcome.status(),
            NavError::Schema(_) => 500,
            NavError::RelationNotFound { .. } => 409,
            NavError::ItemNotFound { .. } => 404,
        }
    }

    /// The outcome attached to a [`NavError::Request`], if any.
    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            NavError::Request(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub(crate) fn schema(msg: impl Into<String>) -> Self {
        NavError::Schema(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use std::collections::BTreeMap;

    #[test]
    fn request_error_reports_response_status() {
        let outcome = Outcome::new(Method::Get, "http://h/x", 418, "I'm a teapot", BTreeMap::new())
            .with_error_body("short and stout");
        let err = NavError::Request(Box::new(outcome));
        assert_eq!(err.kind(), ErrorKind::Request);
        assert_eq!(err.suggested_status(), 418);
        assert_eq!(err.outcome().unwrap().error_body(), Some("short and stout"));
        assert_eq!(
            err.to_string(),
            "the request 'GET http://h/x' resulted in status 418"
        );
    }

    #[test]
    fn suggested_statuses() {
        let transport = NavError::Transport {
            uri: "http://h".into(),
            message: "connection refused".into(),
        };
        assert_eq!(transport.suggested_status(), 502);
        assert_eq!(NavError::schema("bad").suggested_status(), 500);
        assert_eq!(
            NavError::RelationNotFound { relation: "next".into() }.suggested_status(),
            409
        );
        assert_eq!(
            NavError::ItemNotFound { key: "id".into(), value: "7".into() }.suggested_status(),
            404
        );
        assert!(transport.outcome().is_none());
    }

    #[test]
    fn kind_display_is_snake_case() {
        assert_eq!(ErrorKind::RelationNotFound.to_string(), "relation_not_found");
        assert_eq!(ErrorKind::ItemNotFound.to_string(), "item_not_found");
    }
}
