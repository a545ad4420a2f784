//! The stateful navigation facade.
//!
//! A [`Navigator`] owns a [`RequestConfig`], a [`History`], and an
//! [`Execute`] implementation. Requests append to the history; `follow`
//! and `follow_item` resolve a relation against the current outcome and
//! hand back a [`Transition`], which issues the next request against the
//! resolved URI.
//!
//! ```text
//! Idle ──request──▶ HasCurrentResult ──follow──▶ Transition ──request──▶ HasCurrentResult
//!                        ▲    │
//!                        └────┘ request / failed follow
//! ```
//!
//! ```rust,ignore
//! let mut nav = Navigator::new(executor);
//! nav.with_base("http://localhost:8080").accept("application/json");
//!
//! nav.get("/")?
//!     .follow_with_base("books", "http://localhost:8080")?
//!     .get()?
//!     .follow_item("books", "isbn", "978-0441172719", "self")?
//!     .get()?;
//!
//! let book: Book = nav.result().unwrap().json()?;
//! ```

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{join_base, RequestConfig};
use crate::error::NavError;
use crate::execute::Execute;
use crate::history::History;
use crate::links;
use crate::method::Method;
use crate::outcome::Outcome;
use crate::select;

/// Whether a navigator has recorded anything yet.
///
/// The pending state between resolving a relation and requesting it is the
/// [`Transition`] value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    HasCurrentResult,
}

/// Hypermedia client that walks an API relation by relation.
///
/// Not meant for concurrent use: callers sharing one across threads must
/// serialize configure → request → read externally.
#[derive(Debug)]
pub struct Navigator<E> {
    executor: E,
    config: RequestConfig,
    history: History,
}

impl<E: Execute> Navigator<E> {
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, RequestConfig::default())
    }

    pub fn with_config(executor: E, config: RequestConfig) -> Self {
        Self {
            executor,
            config,
            history: History::new(),
        }
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RequestConfig {
        &mut self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn with_base(&mut self, base: impl Into<String>) -> &mut Self {
        self.config.with_base(base);
        self
    }

    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.config.add_header(name, value);
        self
    }

    pub fn accept(&mut self, mime: impl Into<String>) -> &mut Self {
        self.config.accept(mime);
        self
    }

    pub fn content_type(&mut self, mime: impl Into<String>) -> &mut Self {
        self.config.content_type(mime);
        self
    }

    pub fn remove_header(&mut self, name: &str) -> &mut Self {
        self.config.remove_header(name);
        self
    }

    pub fn clear_headers(&mut self) -> &mut Self {
        self.config.clear_headers();
        self
    }

    pub fn add_parameter(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.config.add_parameter(key, value);
        self
    }

    pub fn remove_parameter(&mut self, key: &str) -> &mut Self {
        self.config.remove_parameter(key);
        self
    }

    pub fn clear_parameters(&mut self) -> &mut Self {
        self.config.clear_parameters();
        self
    }

    pub fn with_links_property(&mut self, key: impl Into<String>) -> &mut Self {
        self.config.with_links_property(key);
        self
    }

    pub fn with_request_errors(&mut self, enabled: bool) -> &mut Self {
        self.config.with_request_errors(enabled);
        self
    }

    // ── Requests ──────────────────────────────────────────────────────────────

    /// Issue `method` against `base + uri` and record the outcome.
    pub fn request(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<Vec<u8>>,
    ) -> Result<&mut Self, NavError> {
        let full = self.config.full_uri(uri);
        self.dispatch(method, &full, body.as_deref())
    }

    pub fn get(&mut self, uri: &str) -> Result<&mut Self, NavError> {
        self.request(Method::Get, uri, None)
    }

    pub fn post(&mut self, uri: &str, body: impl Into<Vec<u8>>) -> Result<&mut Self, NavError> {
        self.request(Method::Post, uri, Some(body.into()))
    }

    pub fn put(&mut self, uri: &str, body: impl Into<Vec<u8>>) -> Result<&mut Self, NavError> {
        self.request(Method::Put, uri, Some(body.into()))
    }

    pub fn delete(&mut self, uri: &str) -> Result<&mut Self, NavError> {
        self.request(Method::Delete, uri, None)
    }

    /// `post` with `value` serialised as JSON.
    pub fn post_json<T: Serialize + ?Sized>(&mut self, uri: &str, value: &T) -> Result<&mut Self, NavError> {
        let body = to_json(value)?;
        self.request(Method::Post, uri, Some(body))
    }

    /// `put` with `value` serialised as JSON.
    pub fn put_json<T: Serialize + ?Sized>(&mut self, uri: &str, value: &T) -> Result<&mut Self, NavError> {
        let body = to_json(value)?;
        self.request(Method::Put, uri, Some(body))
    }

    // Sends to an already formed URI; the base prefix is not applied here.
    fn dispatch(&mut self, method: Method, uri: &str, body: Option<&[u8]>) -> Result<&mut Self, NavError> {
        debug!(%method, uri, "request");
        let outcome = self.executor.execute(&self.config, method, uri, body)?;
        self.history.push(outcome);
        Ok(self)
    }

    // ── Transitions ───────────────────────────────────────────────────────────

    /// Resolve `relation` among the links of the current outcome.
    ///
    /// Nothing is recorded, successful or not; the returned [`Transition`]
    /// issues the request.
    pub fn follow(&mut self, relation: &str) -> Result<Transition<'_, E>, NavError> {
        let href = self.relation_href(relation)?;
        Ok(Transition { nav: self, uri: href })
    }

    /// [`follow`](Navigator::follow), prefixing the resolved href with
    /// `base` (exactly one `/` between them).
    pub fn follow_with_base(&mut self, relation: &str, base: &str) -> Result<Transition<'_, E>, NavError> {
        let href = self.relation_href(relation)?;
        Ok(Transition {
            nav: self,
            uri: join_base(base, &href),
        })
    }

    /// Resolve `relation` inside the first entry of `collection_key` whose
    /// `selector_key` equals `selector_value`.
    pub fn follow_item(
        &mut self,
        collection_key: &str,
        selector_key: &str,
        selector_value: &str,
        relation: &str,
    ) -> Result<Transition<'_, E>, NavError> {
        let href = self.item_href(collection_key, selector_key, selector_value, relation)?;
        Ok(Transition { nav: self, uri: href })
    }

    /// [`follow_item`](Navigator::follow_item), prefixing the resolved href
    /// with `base`.
    pub fn follow_item_with_base(
        &mut self,
        collection_key: &str,
        selector_key: &str,
        selector_value: &str,
        relation: &str,
        base: &str,
    ) -> Result<Transition<'_, E>, NavError> {
        let href = self.item_href(collection_key, selector_key, selector_value, relation)?;
        Ok(Transition {
            nav: self,
            uri: join_base(base, &href),
        })
    }

    fn relation_href(&self, relation: &str) -> Result<String, NavError> {
        let doc = self.current_document()?;
        links::find_href(&doc, self.config.links_property(), relation)
    }

    fn item_href(
        &self,
        collection_key: &str,
        selector_key: &str,
        selector_value: &str,
        relation: &str,
    ) -> Result<String, NavError> {
        let doc = self.current_document()?;
        select::resolve_item_href(
            &doc,
            self.config.links_property(),
            collection_key,
            selector_key,
            selector_value,
            relation,
        )
    }

    fn current_document(&self) -> Result<Value, NavError> {
        let body = self
            .history
            .last()
            .and_then(Outcome::response_body)
            .filter(|b| !b.is_empty())
            .ok_or_else(|| NavError::schema("cannot query the response payload since it is empty"))?;
        serde_json::from_slice(body).map_err(|e| {
            NavError::schema(format!(
                "cannot query the response payload since it is not a JSON document: {e}"
            ))
        })
    }

    // ── Results ───────────────────────────────────────────────────────────────

    /// The current outcome, or `None` before the first request.
    pub fn result(&self) -> Option<&Outcome> {
        self.history.last()
    }

    /// Every recorded outcome, oldest first.
    pub fn results(&self) -> &[Outcome] {
        self.history.as_slice()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn state(&self) -> State {
        if self.history.is_empty() {
            State::Idle
        } else {
            State::HasCurrentResult
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, NavError> {
    serde_json::to_vec(value)
        .map_err(|e| NavError::schema(format!("request payload cannot be serialised as JSON: {e}")))
}

/// A resolved relation waiting to be requested.
///
/// The URI is used as resolved; the navigator's base prefix is not applied
/// again. Dropping a transition discards it without side effects.
#[must_use = "a transition does nothing until a request method is called"]
pub struct Transition<'a, E> {
    nav: &'a mut Navigator<E>,
    uri: String,
}

impl<'a, E: Execute> Transition<'a, E> {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn request(self, method: Method, body: Option<Vec<u8>>) -> Result<&'a mut Navigator<E>, NavError> {
        let Transition { nav, uri } = self;
        nav.dispatch(method, &uri, body.as_deref())
    }

    pub fn get(self) -> Result<&'a mut Navigator<E>, NavError> {
        self.request(Method::Get, None)
    }

    pub fn post(self, body: impl Into<Vec<u8>>) -> Result<&'a mut Navigator<E>, NavError> {
        self.request(Method::Post, Some(body.into()))
    }

    pub fn put(self, body: impl Into<Vec<u8>>) -> Result<&'a mut Navigator<E>, NavError> {
        self.request(Method::Put, Some(body.into()))
    }

    pub fn delete(self) -> Result<&'a mut Navigator<E>, NavError> {
        self.request(Method::Delete, None)
    }

    pub fn post_json<T: Serialize + ?Sized>(self, value: &T) -> Result<&'a mut Navigator<E>, NavError> {
        let body = to_json(value)?;
        self.request(Method::Post, Some(body))
    }

    pub fn put_json<T: Serialize + ?Sized>(self, value: &T) -> Result<&'a mut Navigator<E>, NavError> {
        let body = to_json(value)?;
        self.request(Method::Put, Some(body))
    }
}

impl<E> std::fmt::Debug for Transition<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition").field("uri", &self.uri).finish()
    }
}
