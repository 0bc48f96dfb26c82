// Transcript rules: optimistic appends, fixed apology on failed text
// turns, the no-append contract for failed voice turns, and ordering.

mod common;

use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use std::sync::Arc;
use tutor_client::chat::{APOLOGY_MESSAGE, VOICE_PLACEHOLDER, WELCOME_MESSAGE};
use tutor_client::{ApiClient, Author, ChatSession, ClientError};

fn chat(api: Arc<ApiClient>) -> ChatSession {
    ChatSession::new(api, "p1")
}

#[tokio::test]
async fn initialize_appends_welcome_after_context_loads() {
    let app = Router::new().route(
        "/api/homework/problems/:id",
        get(|| async {
            common::ok(common::problem_json(
                "p1",
                "A train leaves the station at 9am travelling at 60km/h toward a second train",
            ))
        }),
    );
    let base = common::serve(app).await;
    let (_session, api) = common::authed_stack(&base, "tok-1").await;
    let chat = chat(api);

    chat.initialize().await;

    let transcript = chat.transcript();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].author, Author::Assistant);
    assert_eq!(transcript[0].content, WELCOME_MESSAGE);

    // Title is the OCR text clipped to its display length
    let title = chat.problem_title().unwrap();
    assert_eq!(title.chars().count(), 50);
}

#[tokio::test]
async fn initialize_failure_is_non_fatal() {
    let (_session, api) = common::authed_stack(common::UNREACHABLE, "tok-1").await;
    let chat = chat(api);

    chat.initialize().await;

    assert!(chat.transcript().is_empty());
    assert!(chat.problem_title().is_none());
}

#[tokio::test]
async fn empty_input_issues_no_request_and_appends_nothing() {
    // Any request would hit a refused port and still append an apology;
    // an unchanged transcript proves no request was issued
    let (_session, api) = common::authed_stack(common::UNREACHABLE, "tok-1").await;
    let chat = chat(api);

    assert!(chat.send_text("").await.is_none());
    assert!(chat.send_text("   \n\t").await.is_none());

    assert!(chat.transcript().is_empty());
}

#[tokio::test]
async fn successful_text_turn_appends_user_then_reply() {
    let app = Router::new().route(
        "/api/chat/message",
        post(|| async {
            common::ok(json!({
                "content": "2+2 equals 4.",
                "audioUrl": "https://cdn.example.com/reply.mp3"
            }))
        }),
    );
    let base = common::serve(app).await;
    let (_session, api) = common::authed_stack(&base, "tok-1").await;
    let chat = chat(api);

    let reply = chat.send_text("what is 2+2").await.unwrap();

    let transcript = chat.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].author, Author::User);
    assert_eq!(transcript[0].content, "what is 2+2");
    assert_eq!(transcript[1].author, Author::Assistant);
    assert_eq!(transcript[1].content, "2+2 equals 4.");
    assert_eq!(
        transcript[1].audio_url.as_deref(),
        Some("https://cdn.example.com/reply.mp3")
    );
    assert_eq!(reply.id, transcript[1].id);
}

#[tokio::test]
async fn failed_text_turn_appends_user_then_apology() {
    let (_session, api) = common::authed_stack(common::UNREACHABLE, "tok-1").await;
    let chat = chat(api);

    let reply = chat.send_text("what is 2+2").await.unwrap();

    let transcript = chat.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].author, Author::User);
    assert_eq!(transcript[0].content, "what is 2+2");
    assert_eq!(transcript[1].author, Author::Assistant);
    assert_eq!(transcript[1].content, APOLOGY_MESSAGE);
    assert_eq!(reply.content, APOLOGY_MESSAGE);
}

#[tokio::test]
async fn business_failure_also_yields_the_apology() {
    let app = Router::new().route(
        "/api/chat/message",
        post(|| async { common::fail(1005, "assistant overloaded") }),
    );
    let base = common::serve(app).await;
    let (_session, api) = common::authed_stack(&base, "tok-1").await;
    let chat = chat(api);

    chat.send_text("help").await.unwrap();

    let transcript = chat.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].content, APOLOGY_MESSAGE);
}

#[tokio::test]
async fn successful_voice_turn_appends_placeholder_and_reply() {
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("turn.mp3");
    tokio::fs::write(&clip, b"mp3-bytes").await.unwrap();

    let app = Router::new()
        .route(
            "/api/upload/audio",
            post(|| async { common::ok(json!({ "audioUrl": "https://cdn.example.com/turn.mp3" })) }),
        )
        .route(
            "/api/chat/audio",
            post(|| async {
                common::ok(json!({ "content": "You asked about fractions.", "audioUrl": null }))
            }),
        );
    let base = common::serve(app).await;
    let (_session, api) = common::authed_stack(&base, "tok-1").await;
    let chat = chat(api);

    let reply = chat.send_audio(&clip).await.unwrap();

    let transcript = chat.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].author, Author::User);
    assert_eq!(transcript[0].content, VOICE_PLACEHOLDER);
    assert_eq!(transcript[1].content, "You asked about fractions.");
    assert_eq!(reply.content, "You asked about fractions.");
}

#[tokio::test]
async fn failed_voice_turn_appends_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("turn.mp3");
    tokio::fs::write(&clip, b"mp3-bytes").await.unwrap();

    // Upload succeeds, interpretation fails: still nothing in the transcript
    let app = Router::new()
        .route(
            "/api/upload/audio",
            post(|| async { common::ok(json!({ "audioUrl": "https://cdn.example.com/turn.mp3" })) }),
        )
        .route(
            "/api/chat/audio",
            post(|| async { common::fail(1006, "could not transcribe audio") }),
        );
    let base = common::serve(app).await;
    let (_session, api) = common::authed_stack(&base, "tok-1").await;
    let chat = chat(api);

    let err = chat.send_audio(&clip).await.unwrap_err();

    match err {
        ClientError::Business(message) => assert_eq!(message, "could not transcribe audio"),
        other => panic!("expected business error, got {other:?}"),
    }
    assert!(chat.transcript().is_empty());
}

#[tokio::test]
async fn message_ids_are_unique_and_appends_stay_at_the_tail() {
    let app = Router::new().route(
        "/api/chat/message",
        post(|| async { common::ok(json!({ "content": "ok", "audioUrl": null })) }),
    );
    let base = common::serve(app).await;
    let (_session, api) = common::authed_stack(&base, "tok-1").await;
    let chat = Arc::new(chat(api));

    // Interleave two turns; completion order decides transcript order, so
    // only uniqueness and tail-append are asserted here
    let a = {
        let chat = Arc::clone(&chat);
        tokio::spawn(async move { chat.send_text("first").await })
    };
    let b = {
        let chat = Arc::clone(&chat);
        tokio::spawn(async move { chat.send_text("second").await })
    };
    a.await.unwrap();
    b.await.unwrap();

    let transcript = chat.transcript();
    assert_eq!(transcript.len(), 4);

    let mut ids: Vec<String> = transcript.iter().map(|m| m.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4, "message ids must be unique");

    let users: Vec<&str> = transcript
        .iter()
        .filter(|m| m.author == Author::User)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(users.len(), 2);
    assert!(users.contains(&"first"));
    assert!(users.contains(&"second"));
}
