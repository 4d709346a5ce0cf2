mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get};

#[tokio::test]
async fn openapi_document_lists_routes() {
    let app = build_test_app().await;

    let response = get(&app, "/api/v1/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["servers"][0]["url"], "/api/v1");
    let paths = json["paths"].as_object().unwrap();
    assert!(paths.contains_key("/authors"));
    assert!(paths.contains_key("/authors/{id}"));
    assert!(paths.contains_key("/books"));
    assert!(paths.contains_key("/books/{id}"));
    assert!(paths.contains_key("/books/createBookAndAuthor"));
    assert!(json["paths"]["/books/createBookAndAuthor"]["post"].is_object());
}

#[tokio::test]
async fn swagger_ui_is_served() {
    let app = build_test_app().await;

    let response = get(&app, "/api/v1/docs/").await;
    assert_eq!(response.status(), StatusCode::OK);
}
