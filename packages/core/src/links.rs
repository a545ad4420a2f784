//! Link discovery and relation resolution over JSON documents.
//!
//! A navigable document advertises its transitions as arrays of link objects
//! stored under a configurable property (`"_links"` by default):
//!
//! ```json
//! {
//!   "_links": [{ "rel": "self", "href": "/orders" }],
//!   "summary": {
//!     "_links": [{ "rel": "next", "href": "/orders?page=2" }]
//!   }
//! }
//! ```
//!
//! Link arrays may appear at any depth of nested objects, so embedded
//! sub-resources can advertise their own transitions next to the top-level
//! ones. Discovery walks the document depth-first, outer object first, and
//! resolution takes the first matching relation in that order.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::NavError;

/// Relation names commonly advertised by hypermedia servers.
pub mod rels {
    pub const SELF: &str = "self";
    pub const COLLECTION: &str = "collection";
    pub const ITEM: &str = "item";
    pub const UPDATE: &str = "update";
    pub const CREATE: &str = "create";
    pub const DELETE: &str = "delete";
    pub const AUTHORIZATION: &str = "authorization";
}

/// A link object as it appears on the wire.
///
/// Only `rel` and `href` take part in navigation; `method` and `media` are
/// carried for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    pub rel: String,
    pub href: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(rename = "media", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// Every array stored under `links_key`, in depth-first, outer-first order.
///
/// At each object the `links_key` property is recorded when it is an array;
/// the walk then descends into each object-valued property in document
/// order. Arrays are not descended into, except that a root array has each
/// of its object elements walked as a top-level object.
pub fn discover_link_nodes<'a>(root: &'a Value, links_key: &str) -> Vec<&'a [Value]> {
    let mut found = Vec::new();
    match root {
        Value::Array(items) => {
            for item in items.iter().filter(|v| v.is_object()) {
                collect(item, links_key, &mut found);
            }
        }
        _ => collect(root, links_key, &mut found),
    }
    found
}

fn collect<'a>(node: &'a Value, links_key: &str, found: &mut Vec<&'a [Value]>) {
    let Some(obj) = node.as_object() else {
        return;
    };
    if let Some(Value::Array(links)) = obj.get(links_key) {
        found.push(links);
    }
    for child in obj.values().filter(|v| v.is_object()) {
        collect(child, links_key, found);
    }
}

/// The `href` of the first link, across `collections` in order, whose `rel`
/// equals `relation` exactly.
///
/// Entries that are not objects or have no string `rel` are skipped. Fails
/// with [`NavError::Schema`] when the first matching entry has no string
/// `href`, and with [`NavError::RelationNotFound`] when nothing matches.
pub fn resolve_href(collections: &[&[Value]], relation: &str) -> Result<String, NavError> {
    for links in collections {
        for link in links.iter() {
            if link.get("rel").and_then(Value::as_str) != Some(relation) {
                continue;
            }
            return match link.get("href").and_then(Value::as_str) {
                Some(href) => {
                    debug!(relation, href, "resolved relation");
                    Ok(href.to_string())
                }
                None => Err(NavError::schema(format!(
                    "the payload advertises the relation {relation:?}, but its 'href' is missing or malformed"
                ))),
            };
        }
    }
    Err(NavError::RelationNotFound {
        relation: relation.to_string(),
    })
}

/// Discover and resolve in one step.
pub fn find_href(root: &Value, links_key: &str, relation: &str) -> Result<String, NavError> {
    resolve_href(&discover_link_nodes(root, links_key), relation)
}

/// All well-formed links in discovery order; malformed entries are skipped.
pub fn hyperlinks(root: &Value, links_key: &str) -> Vec<Hyperlink> {
    discover_link_nodes(root, links_key)
        .into_iter()
        .flatten()
        .filter_map(|v| Hyperlink::deserialize(v).ok())
        .collect()
}
