//! Hypermedia navigation engine.
//!
//! This crate walks JSON-over-HTTP APIs that advertise their transitions as
//! embedded link arrays, so a client only hard-codes the entry point and
//! follows relations from there. It contains no I/O: the HTTP round trip is
//! delegated to an [`Execute`] implementation (see `hypernav-client` for the
//! blocking `reqwest` one).
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`navigator`] | [`Navigator`] facade, [`Transition`], [`State`] |
//! | [`execute`] | [`Execute`] transport seam and the request-error policy |
//! | [`links`] | Link discovery ([`discover_link_nodes`]) and resolution ([`resolve_href`]) |
//! | [`select`] | Item selection within embedded collections ([`resolve_item_href`]) |
//! | [`config`] | [`RequestConfig`]: base prefix, headers, query parameters |
//! | [`outcome`] | [`Outcome`] of one exchange and its [`Payload`] |
//! | [`history`] | Append-only [`History`] of outcomes |
//! | [`error`] | [`NavError`] and [`ErrorKind`] |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use hypernav::{Navigator, NavError};
//!
//! let mut nav = Navigator::new(executor);
//! nav.accept("application/json");
//!
//! nav.get("https://api.example.com/")?
//!     .follow("orders")?
//!     .get()?;
//!
//! match nav.follow("next") {
//!     Ok(t) => { t.get()?; }
//!     Err(NavError::RelationNotFound { .. }) => println!("last page"),
//!     Err(e) => return Err(e),
//! }
//! ```

pub mod config;
pub mod error;
pub mod execute;
pub mod history;
pub mod links;
pub mod method;
pub mod navigator;
pub mod outcome;
pub mod select;

pub use config::{join_base, RequestConfig, DEFAULT_LINKS_PROPERTY};
pub use error::{ErrorKind, NavError};
pub use execute::Execute;
pub use history::History;
pub use links::{discover_link_nodes, find_href, hyperlinks, rels, resolve_href, Hyperlink};
pub use method::Method;
pub use navigator::{Navigator, State, Transition};
pub use outcome::{HeaderMultimap, Outcome, Payload};
pub use select::resolve_item_href;
