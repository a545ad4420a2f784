//! Per-navigator request configuration.
//!
//! A [`RequestConfig`] is applied to every request issued after it was
//! changed; changes never touch outcomes already recorded. It is a plain
//! value so that executors and link discovery can be exercised without a
//! navigator.

use std::collections::BTreeMap;

use urlencoding::encode;

/// Default name of the JSON property that holds a link array.
pub const DEFAULT_LINKS_PROPERTY: &str = "_links";

/// Headers, query parameters, and navigation settings for outgoing requests.
///
/// | Setting | Default |
/// |---------|---------|
/// | base path prefix | `""` |
/// | headers | none |
/// | query parameters | none |
/// | links property | `"_links"` |
/// | request errors | enabled |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    base: String,
    headers: BTreeMap<String, Vec<String>>,
    params: BTreeMap<String, String>,
    links_property: String,
    request_errors: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            base: String::new(),
            headers: BTreeMap::new(),
            params: BTreeMap::new(),
            links_property: DEFAULT_LINKS_PROPERTY.to_string(),
            request_errors: true,
        }
    }
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Setters ───────────────────────────────────────────────────────────────

    /// Prefix prepended to the URI of every subsequent `get`/`post`/`put`/
    /// `delete` call, e.g. `"https://api.example.com:8081"`.
    pub fn with_base(&mut self, base: impl Into<String>) -> &mut Self {
        self.base = base.into();
        self
    }

    /// Append a value to header `name`. Blank names or values are ignored.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let (name, value) = (name.into(), value.into());
        if !name.trim().is_empty() && !value.trim().is_empty() {
            self.headers.entry(name).or_default().push(value);
        }
        self
    }

    /// Replace all `Accept` values with `mime`.
    pub fn accept(&mut self, mime: impl Into<String>) -> &mut Self {
        self.headers.insert("Accept".into(), vec![mime.into()]);
        self
    }

    /// Replace all `Content-Type` values with `mime`.
    pub fn content_type(&mut self, mime: impl Into<String>) -> &mut Self {
        self.headers.insert("Content-Type".into(), vec![mime.into()]);
        self
    }

    pub fn remove_header(&mut self, name: &str) -> &mut Self {
        self.headers.remove(name);
        self
    }

    pub fn clear_headers(&mut self) -> &mut Self {
        self.headers.clear();
        self
    }

    /// Set query parameter `key`; a later call with the same key wins.
    /// Blank keys are ignored.
    pub fn add_parameter(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        let key = key.into();
        if !key.trim().is_empty() {
            self.params.insert(key, value.to_string());
        }
        self
    }

    pub fn remove_parameter(&mut self, key: &str) -> &mut Self {
        self.params.remove(key);
        self
    }

    pub fn clear_parameters(&mut self) -> &mut Self {
        self.params.clear();
        self
    }

    /// Name of the property that holds link arrays in response documents.
    pub fn with_links_property(&mut self, key: impl Into<String>) -> &mut Self {
        self.links_property = key.into();
        self
    }

    /// Whether a non-2xx response fails the call with
    /// [`NavError::Request`](crate::NavError::Request). When disabled, the
    /// error text is recorded in the outcome and the call succeeds.
    pub fn with_request_errors(&mut self, enabled: bool) -> &mut Self {
        self.request_errors = enabled;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Header names with their values, names in sorted order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn header_values(&self, name: &str) -> Option<&[String]> {
        self.headers.get(name).map(Vec::as_slice)
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.keys().any(|k| k.eq_ignore_ascii_case(name))
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn links_property(&self) -> &str {
        &self.links_property
    }

    pub fn request_errors(&self) -> bool {
        self.request_errors
    }

    // ── URI formation ─────────────────────────────────────────────────────────

    /// `base + uri`, applied once when a caller supplies a URI.
    pub fn full_uri(&self, uri: &str) -> String {
        format!("{}{}", self.base, uri)
    }

    /// `uri` with the configured query parameters appended, percent-encoded
    /// and in key order. A `#fragment` stays at the end. Returns `uri`
    /// unchanged when no parameters are set.
    pub fn with_query(&self, uri: &str) -> String {
        if self.params.is_empty() {
            return uri.to_string();
        }
        let query = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let (path, fragment) = match uri.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (uri, None),
        };
        let sep = if path.contains('?') { '&' } else { '?' };
        match fragment {
            Some(fragment) => format!("{path}{sep}{query}#{fragment}"),
            None => format!("{path}{sep}{query}"),
        }
    }
}

/// Prefix `href` with `base`, leaving exactly one `/` between them.
///
/// An empty `base` returns `href` unchanged.
///
/// ```
/// use hypernav::join_base;
/// assert_eq!(join_base("http://host", "/path"), "http://host/path");
/// assert_eq!(join_base("http://host/", "/path"), "http://host/path");
/// assert_eq!(join_base("http://host", "path"), "http://host/path");
/// ```
pub fn join_base(base: &str, href: &str) -> String {
    if base.is_empty() {
        return href.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        href.trim_start_matches('/')
    )
}
