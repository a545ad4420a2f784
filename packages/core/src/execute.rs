//! The transport seam.
//!
//! [`Execute`] is the contract between the navigator and whatever performs
//! HTTP round trips. Implementations only report what the server said
//! ([`Execute::send`]); the request-error policy of the active
//! [`RequestConfig`] is applied uniformly by the provided
//! [`Execute::execute`].
//!
//! # Implementations
//!
//! | Type | Crate |
//! |------|-------|
//! | `HttpExecutor` | `hypernav-client` (blocking `reqwest`) |

use tracing::warn;

use crate::config::RequestConfig;
use crate::error::NavError;
use crate::method::Method;
use crate::outcome::Outcome;

pub trait Execute {
    /// Perform one request and describe the response.
    ///
    /// `uri` is complete except for query parameters, which the
    /// implementation appends with [`RequestConfig::with_query`]. Every
    /// configured header value is sent. The returned outcome carries:
    ///
    /// - `Payload::Empty` for `204 No Content` (the body is not read),
    /// - `Payload::Error(text)` for a non-2xx status,
    /// - `Payload::Body(bytes)` otherwise.
    ///
    /// Fails with [`NavError::Transport`] when no status could be obtained
    /// or a success body could not be read. An unreadable error body is
    /// recorded as empty error text.
    fn send(
        &mut self,
        config: &RequestConfig,
        method: Method,
        uri: &str,
        body: Option<&[u8]>,
    ) -> Result<Outcome, NavError>;

    /// [`send`](Execute::send), then apply the request-error policy: a
    /// non-2xx outcome becomes [`NavError::Request`] unless request errors
    /// are disabled in `config`.
    fn execute(
        &mut self,
        config: &RequestConfig,
        method: Method,
        uri: &str,
        body: Option<&[u8]>,
    ) -> Result<Outcome, NavError> {
        let outcome = self.send(config, method, uri, body)?;
        settle(config, outcome)
    }
}

impl<E: Execute + ?Sized> Execute for &mut E {
    fn send(
        &mut self,
        config: &RequestConfig,
        method: Method,
        uri: &str,
        body: Option<&[u8]>,
    ) -> Result<Outcome, NavError> {
        (**self).send(config, method, uri, body)
    }
}

impl<E: Execute + ?Sized> Execute for Box<E> {
    fn send(
        &mut self,
        config: &RequestConfig,
        method: Method,
        uri: &str,
        body: Option<&[u8]>,
    ) -> Result<Outcome, NavError> {
        (**self).send(config, method, uri, body)
    }
}

fn settle(config: &RequestConfig, outcome: Outcome) -> Result<Outcome, NavError> {
    if outcome.is_success() {
        return Ok(outcome);
    }
    warn!(
        method = %outcome.method(),
        uri = outcome.uri(),
        status = outcome.status(),
        "error status"
    );
    if config.request_errors() {
        Err(NavError::Request(Box::new(outcome)))
    } else {
        Ok(outcome)
    }
}
