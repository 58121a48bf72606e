#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use pushpanel::config::{AllowList, Config};
use pushpanel::runtime;

pub const PUSH_SCRIPT: &str = "./github_push.sh";

/// Config rooted at `root` with the stock single-entry allow-list.
pub fn test_config(root: &Path) -> Config {
    Config {
        root: root.to_path_buf(),
        allowed_scripts: AllowList::new([PUSH_SCRIPT]),
        ..Config::default()
    }
}

/// Full application router, as `serve` builds it.
pub fn build_test_app(root: &Path) -> Router {
    runtime::router(test_config(root))
}

/// Write `github_push.sh` into `root` with a `/bin/sh` shebang.
pub fn write_push_script(root: &Path, body: &str) {
    std::fs::write(root.join("github_push.sh"), format!("#!/bin/sh\n{body}"))
        .expect("write script");
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request");
    app.oneshot(request).await.expect("oneshot")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    app.oneshot(request).await.expect("oneshot")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body is JSON")
}
