//! Item selection within an embedded collection.
//!
//! Collection resources usually embed their members, each with its own
//! links:
//!
//! ```json
//! {
//!   "books": [
//!     { "isbn": "978-0441172719", "_links": [{ "rel": "self", "href": "/books/1" }] },
//!     { "isbn": "978-0553293357", "_links": [{ "rel": "self", "href": "/books/2" }] }
//!   ]
//! }
//! ```
//!
//! [`resolve_item_href`] picks the member whose selector property matches and
//! resolves a relation within that member only.

use std::borrow::Cow;

use serde_json::Value;

use crate::error::NavError;
use crate::links;

/// Resolve `relation` inside the first entry of `document[collection_key]`
/// whose `selector_key` property reads exactly `selector_value`.
///
/// String, number, and boolean properties are compared through their
/// textual form; other property types never match.
///
/// # Errors
///
/// - [`NavError::Schema`] if `collection_key` is absent or not an array.
/// - [`NavError::ItemNotFound`] if no entry matches the selector.
/// - [`NavError::RelationNotFound`] if the selected entry does not advertise
///   `relation`, and [`NavError::Schema`] if its `href` is malformed.
pub fn resolve_item_href(
    document: &Value,
    links_key: &str,
    collection_key: &str,
    selector_key: &str,
    selector_value: &str,
    relation: &str,
) -> Result<String, NavError> {
    let items = document
        .get(collection_key)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            NavError::schema(format!(
                "response payload does not contain a JSON array named {collection_key:?}"
            ))
        })?;

    let item = items
        .iter()
        .find(|item| {
            item.get(selector_key)
                .and_then(text_of)
                .is_some_and(|text| text == selector_value)
        })
        .ok_or_else(|| NavError::ItemNotFound {
            key: selector_key.to_string(),
            value: selector_value.to_string(),
        })?;

    links::find_href(item, links_key, relation)
}

fn text_of(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}
