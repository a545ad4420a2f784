//! Blocking HTTP transport for [`hypernav`].
//!
//! [`HttpExecutor`] implements [`Execute`] over a
//! [`reqwest::blocking::Client`]. Every call blocks until the round trip
//! completes. The executor enforces no timeout of its own; pass a client
//! built with [`reqwest::blocking::ClientBuilder::timeout`] to
//! [`HttpExecutor::with_client`] when latency must be bounded.
//!
//! ```rust,no_run
//! use hypernav_client::navigator_with_base;
//!
//! # fn main() -> Result<(), hypernav::NavError> {
//! let mut nav = navigator_with_base("http://localhost:8080");
//! nav.accept("application/json");
//! nav.get("/")?.follow_with_base("books", "http://localhost:8080")?.get()?;
//! println!("{}", nav.result().and_then(|r| r.text()).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use hypernav::{Execute, HeaderMultimap, Method, NavError, Navigator, Outcome, RequestConfig};
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use tracing::{debug, warn};

pub use hypernav;

/// A [`Navigator`] backed by blocking HTTP.
pub type HttpNavigator = Navigator<HttpExecutor>;

/// A navigator with a default client and an empty base prefix. Use this
/// when the server advertises absolute URIs.
pub fn navigator() -> HttpNavigator {
    Navigator::new(HttpExecutor::new())
}

/// A navigator whose request URIs are prefixed with `base`, e.g.
/// `"https://api.example.com:8081"`. Use this when the server advertises
/// path-only links.
pub fn navigator_with_base(base: impl Into<String>) -> HttpNavigator {
    let mut nav = navigator();
    nav.with_base(base);
    nav
}

/// [`Execute`] implementation over a blocking `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a pre-configured client (timeouts, proxies, TLS roots, …).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Execute for HttpExecutor {
    fn send(
        &mut self,
        config: &RequestConfig,
        method: Method,
        uri: &str,
        body: Option<&[u8]>,
    ) -> Result<Outcome, NavError> {
        let target = config.with_query(uri);
        let mut req = self.client.request(to_reqwest(method), &target);
        for (name, values) in config.headers() {
            for value in values {
                req = req.header(name, value.as_str());
            }
        }
        if let Some(bytes) = body {
            req = req.body(bytes.to_vec());
        }

        let response = req.send().map_err(|e| transport(uri, e))?;
        let status = response.status();
        debug!(%method, uri = target.as_str(), status = status.as_u16(), "response");

        let outcome = Outcome::new(
            method,
            uri,
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            collect_headers(response.headers()),
        );

        if !status.is_success() {
            let text = error_text(uri, response.text());
            return Ok(outcome.with_error_body(text));
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(outcome);
        }
        let bytes = response.bytes().map_err(|e| transport(uri, e))?;
        Ok(outcome.with_body(bytes.to_vec()))
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn transport(uri: &str, e: reqwest::Error) -> NavError {
    warn!(uri, "transport failure: {e}");
    NavError::Transport {
        uri: uri.to_string(),
        message: e.to_string(),
    }
}

// The status is already known, so a failed read keeps the outcome and
// records an empty error text.
fn error_text(uri: &str, read: reqwest::Result<String>) -> String {
    read.unwrap_or_else(|e| {
        warn!(uri, "error body unreadable: {e}");
        String::new()
    })
}

// Header names come out of `HeaderMap` lowercased; values keep arrival order.
fn collect_headers(headers: &HeaderMap) -> HeaderMultimap {
    let mut out = HeaderMultimap::new();
    for (name, value) in headers {
        out.entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    out
}
