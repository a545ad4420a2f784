//! End-to-end conformance tests for the hypernav navigator.
//!
//! Each test spawns the fixture API (real TCP, real HTTP) via
//! [`hypernav_conformance::spawn_server`] and walks it with the blocking
//! `reqwest` executor from `hypernav-client`.
//!
//! # Coverage
//!
//! | Test | Behaviour |
//! |------|-----------|
//! | `get_records_one_outcome` | request → history |
//! | `follow_relative_link_with_base` | follow + base join |
//! | `follow_with_trailing_slash_base` | base join collapses the slash |
//! | `nested_links_are_followed` | nested link collections |
//! | `outer_collection_wins` | first match, outer before nested |
//! | `follow_item_then_get` | item selection |
//! | `follow_item_unknown_value` | ItemNotFound, history unchanged |
//! | `follow_item_unknown_collection` | Schema |
//! | `no_content_has_no_body` | 204 handling |
//! | `follow_after_no_content_fails` | empty payload |
//! | `not_found_raises_request_error` | RequestError carries outcome |
//! | `error_body_recorded_when_errors_disabled` | exceptionOnError = false |
//! | `non_json_payload_is_schema_error` | Schema |
//! | `malformed_href_is_schema_error` | Schema |
//! | `unknown_relation` | RelationNotFound |
//! | `transport_failure` | Transport / 502 |
//! | `headers_are_sent` | configured headers |
//! | `query_parameters_on_every_method` | parameter serialization |
//! | `post_and_put_send_bodies` | body-bearing methods |
//! | `full_crud_walk` | multi-hop walk, history order |
//! | `response_headers_recorded` | response header multimap |

use hypernav::{ErrorKind, Method, State};
use hypernav_client::{navigator, navigator_with_base, HttpNavigator};
use hypernav_conformance::spawn_server;
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn connect() -> (String, HttpNavigator) {
    let base = spawn_server();
    let mut nav = navigator_with_base(base.clone());
    nav.accept("application/json");
    (base, nav)
}

fn body_json(nav: &HttpNavigator) -> Value {
    nav.result().expect("a current outcome").json().expect("JSON body")
}

#[derive(Debug, Deserialize)]
struct Book {
    id: String,
    title: String,
}

// ---------------------------------------------------------------------------
// Requests and history
// ---------------------------------------------------------------------------

#[test]
fn get_records_one_outcome() {
    let (base, mut nav) = connect();
    assert_eq!(nav.state(), State::Idle);

    nav.get("/").unwrap();

    assert_eq!(nav.state(), State::HasCurrentResult);
    assert_eq!(nav.results().len(), 1);
    let r = nav.result().unwrap();
    assert_eq!(r.uri(), format!("{base}/"));
    assert_eq!(r.status(), 200);
    assert_eq!(r.status_message(), "OK");
    assert_eq!(r.method(), Method::Get);
    assert_eq!(body_json(&nav)["name"], "library");
}

#[test]
fn response_headers_recorded() {
    let (_base, mut nav) = connect();
    nav.post("/books", r#"{"title":"Hyperion"}"#).unwrap();
    let r = nav.result().unwrap();
    assert_eq!(r.status(), 201);
    assert_eq!(r.header("Location"), Some("/books/4"));
    assert_eq!(r.headers()["content-type"], ["application/json"]);
}

// ---------------------------------------------------------------------------
// Following relations
// ---------------------------------------------------------------------------

#[test]
fn follow_relative_link_with_base() {
    let (base, mut nav) = connect();
    nav.get("/").unwrap();

    let transition = nav.follow_with_base("books", &base).unwrap();
    assert_eq!(transition.uri(), format!("{base}/books"));
    transition.get().unwrap();

    assert_eq!(nav.results().len(), 2);
    assert_eq!(body_json(&nav)["books"].as_array().unwrap().len(), 3);
}

#[test]
fn follow_with_trailing_slash_base() {
    let (base, mut nav) = connect();
    nav.get("/").unwrap();
    let transition = nav.follow_with_base("books", &format!("{base}/")).unwrap();
    assert_eq!(transition.uri(), format!("{base}/books"));
}

#[test]
fn nested_links_are_followed() {
    let (base, mut nav) = connect();
    nav.get("/").unwrap().follow_with_base("health", &base).unwrap().get().unwrap();
    let r = nav.result().unwrap();
    assert_eq!(r.status(), 204);
    assert_eq!(r.uri(), format!("{base}/health"));
}

#[test]
fn outer_collection_wins() {
    // `books` is advertised at the top level and again under `meta`.
    let (_base, mut nav) = connect();
    nav.get("/").unwrap();
    assert_eq!(nav.follow("books").unwrap().uri(), "/books");
}

#[test]
fn follow_item_then_get() {
    let (base, mut nav) = connect();
    nav.get("/books")
        .unwrap()
        .follow_item_with_base("books", "isbn", "978-0553293357", "self", &base)
        .unwrap()
        .get()
        .unwrap();

    let book: Book = nav.result().unwrap().json().unwrap();
    assert_eq!(book.id, "2");
    assert_eq!(book.title, "Foundation");
}

#[test]
fn follow_item_unknown_value() {
    let (_base, mut nav) = connect();
    nav.get("/books").unwrap();
    let before = nav.results().len();

    let err = nav.follow_item("books", "isbn", "000-0000000000", "self").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ItemNotFound);
    assert_eq!(err.suggested_status(), 404);
    assert_eq!(nav.results().len(), before);
}

#[test]
fn follow_item_unknown_collection() {
    let (_base, mut nav) = connect();
    nav.get("/books").unwrap();
    let err = nav.follow_item("authors", "id", "1", "self").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn unknown_relation() {
    let (_base, mut nav) = connect();
    nav.get("/").unwrap();
    let err = nav.follow("checkout").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RelationNotFound);
    assert_eq!(nav.results().len(), 1);
}

// ---------------------------------------------------------------------------
// Payload edge cases
// ---------------------------------------------------------------------------

#[test]
fn no_content_has_no_body() {
    let (_base, mut nav) = connect();
    nav.delete("/books/1").unwrap();
    let r = nav.result().unwrap();
    assert_eq!(r.status(), 204);
    assert!(r.response_body().is_none());
    assert!(r.error_body().is_none());
}

#[test]
fn follow_after_no_content_fails() {
    let (_base, mut nav) = connect();
    nav.get("/health").unwrap();
    let err = nav.follow("self").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert_eq!(nav.results().len(), 1);
}

#[test]
fn non_json_payload_is_schema_error() {
    let (_base, mut nav) = connect();
    nav.get("/broken").unwrap();
    assert!(nav.result().unwrap().text().unwrap().starts_with("<html>"));
    assert_eq!(nav.follow("self").unwrap_err().kind(), ErrorKind::Schema);
}

#[test]
fn malformed_href_is_schema_error() {
    let (_base, mut nav) = connect();
    nav.get("/malformed").unwrap();
    assert_eq!(nav.follow("next").unwrap_err().kind(), ErrorKind::Schema);
}

// ---------------------------------------------------------------------------
// Error statuses and transport failures
// ---------------------------------------------------------------------------

#[test]
fn not_found_raises_request_error() {
    let (base, mut nav) = connect();
    let err = nav.get("/books/99").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Request);
    assert_eq!(err.suggested_status(), 404);
    let outcome = err.outcome().unwrap();
    assert_eq!(outcome.uri(), format!("{base}/books/99"));
    assert!(outcome.error_body().unwrap().contains("not_found"));
    assert!(outcome.response_body().is_none());
    assert_eq!(outcome.header("content-type"), Some("application/json"));
    assert!(nav.results().is_empty());
}

#[test]
fn error_body_recorded_when_errors_disabled() {
    let (_base, mut nav) = connect();
    nav.with_request_errors(false);

    nav.get("/gone").unwrap();

    let r = nav.result().unwrap();
    assert_eq!(r.status(), 500);
    assert_eq!(r.error_body(), Some("upstream exploded"));
    assert!(r.response_body().is_none());
    assert_eq!(nav.results().len(), 1);
}

#[test]
fn transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut nav = navigator();
    let err = nav.get(&format!("http://{addr}/")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.suggested_status(), 502);
    assert_eq!(nav.state(), State::Idle);
}

// ---------------------------------------------------------------------------
// Headers, parameters, and bodies
// ---------------------------------------------------------------------------

#[test]
fn headers_are_sent() {
    let (_base, mut nav) = connect();
    nav.add_header("X-Trace", "abc").add_header("X-Trace", "def");

    nav.get("/echo").unwrap();

    let echoed = body_json(&nav);
    assert_eq!(echoed["headers"]["accept"][0], "application/json");
    assert_eq!(echoed["headers"]["x-trace"], serde_json::json!(["abc", "def"]));

    nav.remove_header("X-Trace");
    nav.get("/echo").unwrap();
    assert!(body_json(&nav)["headers"].get("x-trace").is_none());
}

#[test]
fn query_parameters_on_every_method() {
    let (_base, mut nav) = connect();
    nav.add_parameter("page", 2).add_parameter("q", "a b");

    for method in [Method::Get, Method::Post, Method::Put, Method::Delete] {
        nav.request(method, "/echo", None).unwrap();
        let echoed = body_json(&nav);
        assert_eq!(echoed["method"], method.as_str());
        assert_eq!(echoed["query"]["page"], "2");
        assert_eq!(echoed["query"]["q"], "a b");
    }

    // Parameters are recorded in the request, not in the outcome URI.
    assert!(!nav.result().unwrap().uri().contains('?'));

    nav.clear_parameters();
    nav.get("/echo").unwrap();
    assert_eq!(body_json(&nav)["query"], serde_json::json!({}));
}

#[test]
fn post_and_put_send_bodies() {
    let (base, mut nav) = connect();
    nav.content_type("application/json");

    nav.post_json("/books", &serde_json::json!({"title": "Hyperion"})).unwrap();
    assert_eq!(body_json(&nav)["received"]["title"], "Hyperion");

    nav.follow_with_base("self", &base)
        .unwrap()
        .put(r#"{"title":"Hyperion (2nd ed.)"}"#)
        .unwrap();
    let updated = body_json(&nav);
    assert_eq!(updated["id"], "4");
    assert_eq!(updated["received"]["title"], "Hyperion (2nd ed.)");
}

#[test]
fn full_crud_walk() {
    let (base, mut nav) = connect();

    nav.get("/")
        .unwrap()
        .follow_with_base("books", &base)
        .unwrap()
        .get()
        .unwrap()
        .follow_item_with_base("books", "title", "Neuromancer", "update", &base)
        .unwrap()
        .put_json(&serde_json::json!({"title": "Neuromancer"}))
        .unwrap()
        .get("/books/3")
        .unwrap()
        .follow_with_base("delete", &base)
        .unwrap()
        .delete()
        .unwrap();

    let trail: Vec<(Method, String, u16)> = nav
        .results()
        .iter()
        .map(|r| (r.method(), r.uri().trim_start_matches(&base).to_string(), r.status()))
        .collect();
    assert_eq!(
        trail,
        [
            (Method::Get, "/".to_string(), 200),
            (Method::Get, "/books".to_string(), 200),
            (Method::Put, "/books/3".to_string(), 200),
            (Method::Get, "/books/3".to_string(), 200),
            (Method::Delete, "/books/3".to_string(), 204),
        ]
    );
    assert_eq!(nav.result(), nav.results().last());
}
