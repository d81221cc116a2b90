use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use clinic_core::{Author, Catalog, Locale, SessionPhase, Translator, Urgency};
use clinic_observability::ChatMetrics;
use clinic_session::{ChatSession, SendOutcome, CONNECTION_APOLOGY, GREETING_KEY};
use clinic_tests::{spawn_backend, unreachable_base_url};
use clinic_transport::{ClientConfig, HttpTransport};
use serde_json::{json, Value};

fn session_for(base_url: &str) -> ChatSession<HttpTransport> {
    let transport = HttpTransport::new(&ClientConfig::new(base_url)).unwrap();
    ChatSession::new(
        transport,
        Arc::new(Catalog::new(Locale::En)),
        ChatMetrics::shared(),
    )
}

fn reply_backend(reply: &'static str) -> Router {
    Router::new().route(
        "/api/chat",
        post(move |Json(_body): Json<Value>| async move { Json(json!({ "reply": reply })) }),
    )
}

#[tokio::test]
async fn welcome_start_send_roundtrip() {
    let base_url = spawn_backend(reply_backend("Hi, how can I help?")).await;
    let session = session_for(&base_url);

    assert_eq!(session.phase(), SessionPhase::Welcome);
    assert!(session.start());

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert_eq!(snapshot.messages.len(), 1);
    assert_eq!(
        snapshot.messages[0].text,
        Catalog::new(Locale::En).t(GREETING_KEY)
    );

    session.update_draft("hello");
    let outcome = session.send().await;
    assert_eq!(
        outcome,
        SendOutcome::Delivered {
            urgency: Urgency::Normal
        }
    );

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    let history: Vec<_> = snapshot
        .messages
        .iter()
        .map(|message| (message.author, message.text.as_str(), message.urgency))
        .collect();
    assert_eq!(
        history[1..],
        [
            (Author::User, "hello", Urgency::Normal),
            (Author::Bot, "Hi, how can I help?", Urgency::Normal),
        ]
    );
}

#[tokio::test]
async fn server_error_becomes_apology() {
    let router = Router::new().route(
        "/api/chat",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base_url = spawn_backend(router).await;
    let session = session_for(&base_url);
    session.start();
    session.update_draft("hello");

    assert_eq!(session.send().await, SendOutcome::Failed);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert_eq!(snapshot.messages.len(), 3);
    assert_eq!(snapshot.messages[1].author, Author::User);
    assert_eq!(snapshot.messages[1].text, "hello");
    assert_eq!(snapshot.messages[2].author, Author::Bot);
    assert_eq!(snapshot.messages[2].text, CONNECTION_APOLOGY);
    assert_eq!(snapshot.messages[2].urgency, Urgency::Normal);
}

#[tokio::test]
async fn emergency_reply_is_flagged() {
    let base_url = spawn_backend(reply_backend(
        "These symptoms can be critical. Call 911 immediately.",
    ))
    .await;
    let session = session_for(&base_url);
    session.start();
    session.update_draft("Chest pain");

    assert_eq!(
        session.send().await,
        SendOutcome::Delivered {
            urgency: Urgency::Emergency
        }
    );
    assert_eq!(session.metrics().snapshot().emergency_replies_total, 1);
}

#[tokio::test]
async fn offline_send_recovers_for_next_attempt() {
    let session = session_for(&unreachable_base_url());
    session.start();

    session.update_draft("first try");
    assert_eq!(session.send().await, SendOutcome::Failed);
    session.update_draft("second try");
    assert_eq!(session.send().await, SendOutcome::Failed);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert_eq!(snapshot.messages.len(), 5);
    assert_eq!(session.metrics().snapshot().send_failures_total, 2);
}
