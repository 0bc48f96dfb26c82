#![allow(dead_code)]

// Shared test harness: an in-process stub backend speaking the envelope
// protocol, plus builders for the client stack.

use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tutor_client::platform::MemoryStore;
use tutor_client::{ApiClient, RequestGateway, SessionStore};

/// A base URL that refuses connections, for transport-failure cases
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Serve `router` on an ephemeral port, returning the base URL
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Success envelope
pub fn ok(data: Value) -> Json<Value> {
    Json(json!({ "code": 0, "message": "ok", "data": data }))
}

/// Error envelope with a business or auth code
pub fn fail(code: i64, message: &str) -> Json<Value> {
    Json(json!({ "code": code, "message": message, "data": null }))
}

/// A problem payload as the backend returns it
pub fn problem_json(id: &str, ocr_text: &str) -> Value {
    json!({
        "id": id,
        "imageUrl": format!("https://cdn.example.com/{id}.jpg"),
        "ocrText": ocr_text,
        "answer": "4",
        "steps": ["add the numbers"],
        "knowledgePoints": ["addition"],
        "subject": "math",
        "difficulty": "easy"
    })
}

/// Unauthenticated client stack against `base_url`
pub async fn client_stack(base_url: &str) -> (Arc<SessionStore>, Arc<ApiClient>) {
    let session = Arc::new(SessionStore::new(Box::new(MemoryStore::new())));
    session.init().await;
    let gateway = RequestGateway::new(base_url, Duration::from_secs(10), Arc::clone(&session));
    (session, Arc::new(ApiClient::new(gateway)))
}

/// Client stack already signed in with `token`
pub async fn authed_stack(base_url: &str, token: &str) -> (Arc<SessionStore>, Arc<ApiClient>) {
    let (session, api) = client_stack(base_url).await;
    session.set(token, None).await.unwrap();
    (session, api)
}

/// Poll `check` until it passes or the deadline expires
pub async fn wait_until(check: impl Fn() -> bool) {
    for _ in 0..100 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within deadline");
}
