//! Integration tests for the page, static files and health check.

mod common;

use axum::http::StatusCode;
use common::{body_bytes, build_test_app, get};

#[tokio::test]
async fn root_serves_the_panel_page() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("github-push-ui.html"), "<h1>panel</h1>").unwrap();

    let response = get(build_test_app(dir.path()), "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"<h1>panel</h1>");
}

#[tokio::test]
async fn root_is_404_without_the_page() {
    let dir = tempfile::tempdir().unwrap();
    let response = get(build_test_app(dir.path()), "/").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn files_under_root_are_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("css")).unwrap();
    std::fs::write(dir.path().join("css/site.css"), "body{}").unwrap();

    let response = get(build_test_app(dir.path()), "/css/site.css").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"body{}");
}

#[tokio::test]
async fn unknown_file_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let response = get(build_test_app(dir.path()), "/nope.js").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_returns_ok() {
    let dir = tempfile::tempdir().unwrap();
    let response = get(build_test_app(dir.path()), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");
}
