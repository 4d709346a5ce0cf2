#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use library_api::database::{SqliteRepository, run_migrations};
use library_api::http::{AppState, router};
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

/// The full router over a fresh in-memory database.
///
/// A single connection that never expires keeps the in-memory database alive
/// for the whole test.
pub async fn build_test_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database should open");
    run_migrations(&pool)
        .await
        .expect("migrations should apply");

    router(AppState::new(SqliteRepository::new(pool)))
}

/// Author "James Cook" (id 1) and book "Test Book" (id 1) written by him.
pub async fn build_seeded_app() -> Router {
    let app = build_test_app().await;

    let response = post_json(
        &app,
        "/api/v1/authors",
        json!({"first_name": "James", "last_name": "Cook"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        &app,
        "/api/v1/books",
        json!({
            "title": "Test Book",
            "author": 1,
            "isbn": "1234567890123",
            "published": "2016-11-13",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    app
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Body>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder.header(CONTENT_TYPE, "application/json").body(body),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(Body::from(body.to_string()))).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(Body::from(body.to_string()))).await
}

pub async fn delete(app: &Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
