//! Shared helpers for the hypernav conformance test suite.
//!
//! Provides [`spawn_server`], which binds an ephemeral port, serves a small
//! hypermedia "library" API from an in-process axum router, and returns the
//! base URL. Tests then walk it with a real blocking HTTP navigator.
//!
//! # Fixture API
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET | `/` | entry document; `_links` + nested `meta._links` |
//! | GET | `/health` | `204` |
//! | GET | `/books` | collection with embedded `books[]`, each with its own links |
//! | GET | `/books/{id}` | one book, or `404` |
//! | POST | `/books` | `201`, echoes body and query, `Location` header |
//! | PUT | `/books/{id}` | `200`, echoes body |
//! | DELETE | `/books/{id}` | `204` |
//! | any | `/echo` | method, headers, query, and body as JSON |
//! | GET | `/broken` | `200` with a non-JSON body |
//! | GET | `/malformed` | links whose `href` is not a string |
//! | GET | `/gone` | `500` with a plain-text body |
//!
//! All hrefs are path-only, so tests follow them with a base.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde_json::{json, Value};

/// Start the fixture API on `127.0.0.1:<ephemeral>` and return its base URL,
/// e.g. `http://127.0.0.1:51234`.
///
/// The server runs on its own thread with its own tokio runtime, so it can
/// be driven from plain `#[test]` functions using blocking clients.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub fn spawn_server() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.set_nonblocking(true).expect("set listener non-blocking");
    let addr = listener.local_addr().expect("get local addr");

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("build fixture runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("adopt listener");
            axum::serve(listener, router())
                .await
                .expect("fixture server error");
        });
    });

    format!("http://{addr}")
}

/// The fixture router, exposed for tests that want to mount it elsewhere.
pub fn router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route("/echo", any(echo))
        .route("/broken", get(broken))
        .route("/malformed", get(malformed))
        .route("/gone", get(gone))
}

const BOOKS: [(&str, &str, &str); 3] = [
    ("1", "978-0441172719", "Dune"),
    ("2", "978-0553293357", "Foundation"),
    ("3", "978-0441569595", "Neuromancer"),
];

fn book_doc(id: &str, isbn: &str, title: &str) -> Value {
    json!({
        "id": id,
        "isbn": isbn,
        "title": title,
        "_links": [
            {"rel": "self", "href": format!("/books/{id}"), "method": "GET"},
            {"rel": "update", "href": format!("/books/{id}"), "method": "PUT"},
            {"rel": "delete", "href": format!("/books/{id}"), "method": "DELETE"},
            {"rel": "collection", "href": "/books"}
        ]
    })
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "library",
        "_links": [
            {"rel": "self", "href": "/"},
            {"rel": "books", "href": "/books"},
            {"rel": "echo", "href": "/echo"},
            {"rel": "broken", "href": "/broken"},
            {"rel": "malformed", "href": "/malformed"},
            {"rel": "gone", "href": "/gone"}
        ],
        "meta": {
            "_links": [
                {"rel": "health", "href": "/health"},
                {"rel": "books", "href": "/books?shadowed=true"}
            ]
        }
    }))
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn list_books() -> Json<Value> {
    let books: Vec<Value> = BOOKS
        .iter()
        .map(|(id, isbn, title)| book_doc(id, isbn, title))
        .collect();
    Json(json!({
        "books": books,
        "_links": [
            {"rel": "self", "href": "/books"},
            {"rel": "create", "href": "/books", "method": "POST"}
        ]
    }))
}

async fn get_book(Path(id): Path<String>) -> Response {
    match BOOKS.iter().find(|(bid, _, _)| *bid == id) {
        Some((id, isbn, title)) => Json(book_doc(id, isbn, title)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("no book with id {id}"), "code": "not_found"})),
        )
            .into_response(),
    }
}

async fn create_book(Query(query): Query<BTreeMap<String, String>>, body: Bytes) -> Response {
    let received: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (
        StatusCode::CREATED,
        [(header::LOCATION, "/books/4")],
        Json(json!({
            "id": "4",
            "received": received,
            "query": query,
            "_links": [{"rel": "self", "href": "/books/4"}]
        })),
    )
        .into_response()
}

async fn update_book(Path(id): Path<String>, body: Bytes) -> Json<Value> {
    let received: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    Json(json!({"id": id, "received": received}))
}

async fn delete_book(Path(_id): Path<String>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn echo(
    method: Method,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
    body: Bytes,
) -> Json<Value> {
    let mut echoed: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in &headers {
        echoed
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    Json(json!({
        "method": method.as_str(),
        "headers": echoed,
        "query": query,
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn broken() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html")], "<html><body>not json</body></html>")
}

async fn malformed() -> Json<Value> {
    Json(json!({"_links": [{"rel": "next", "href": 17}]}))
}

async fn gone() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}
