//! Shared helpers for router tests.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use cicy_core::{MessageStore, NotificationChannel};
use cicy_server::{AppState, AuthToken, FsImageSink, ImageFetcher, config::DEFAULT_BODY_LIMIT};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TOKEN: &str = "test-token";

pub struct Harness {
    pub state: AppState,
    pub router: Router,
    pub image_dir: TempDir,
}

pub fn harness() -> Harness {
    let image_dir = tempfile::tempdir().unwrap();
    let state = AppState {
        store: Arc::new(MessageStore::new()),
        notifier: Arc::new(NotificationChannel::new()),
        images: Arc::new(FsImageSink::new(image_dir.path())),
        fetcher: ImageFetcher::new(Duration::from_secs(5)).unwrap(),
        token: AuthToken::new(TOKEN),
    };
    let router = cicy_server::create_router(state.clone(), DEFAULT_BODY_LIMIT);
    Harness {
        state,
        router,
        image_dir,
    }
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed(uri: &str, body: &Value) -> Request<Body> {
    let mut request = json_request("POST", uri, body);
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {TOKEN}").parse().unwrap(),
    );
    request
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// One `tools/call` envelope.
pub fn tool_call(id: i64, name: &str, arguments: Value) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
}
