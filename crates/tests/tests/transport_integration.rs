use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use clinic_tests::{spawn_backend, unreachable_base_url};
use clinic_transport::{ChatTransport, ClientConfig, HttpTransport, SendError, NO_REPLY_FALLBACK};
use parking_lot::Mutex;
use serde_json::{json, Value};

fn transport_for(base_url: &str) -> HttpTransport {
    let config = ClientConfig::new(base_url).with_debug(true);
    HttpTransport::new(&config).expect("transport should build")
}

fn status_backend(status: StatusCode) -> Router {
    Router::new().route("/api/chat", post(move || async move { status }))
}

#[tokio::test]
async fn posts_message_and_returns_reply() {
    let seen: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let router = Router::new().route(
        "/api/chat",
        post(move |Json(body): Json<Value>| async move {
            recorder.lock().push(body);
            Json(json!({ "reply": "Hi, how can I help?" }))
        }),
    );
    let base_url = spawn_backend(router).await;

    let reply = transport_for(&base_url).send("hello").await.unwrap();

    assert_eq!(reply, "Hi, how can I help?");
    assert_eq!(seen.lock().as_slice(), &[json!({ "message": "hello" })]);
}

#[tokio::test]
async fn missing_reply_field_uses_fallback() {
    let router = Router::new().route(
        "/api/chat",
        post(|| async { Json(json!({ "answer": "wrong field" })) }),
    );
    let base_url = spawn_backend(router).await;

    let reply = transport_for(&base_url).send("hello").await.unwrap();
    assert_eq!(reply, NO_REPLY_FALLBACK);
}

#[tokio::test]
async fn malformed_body_is_generic_error() {
    let router = Router::new().route("/api/chat", post(|| async { "definitely not json" }));
    let base_url = spawn_backend(router).await;

    let err = transport_for(&base_url).send("hello").await.unwrap_err();
    assert_eq!(err, SendError::Generic);
}

#[tokio::test]
async fn unknown_route_is_endpoint_not_found() {
    let base_url = spawn_backend(Router::new()).await;

    let err = transport_for(&base_url).send("hello").await.unwrap_err();
    assert_eq!(err, SendError::EndpointNotFound);
}

#[tokio::test]
async fn server_failures_map_to_server_error() {
    let base_url = spawn_backend(status_backend(StatusCode::BAD_GATEWAY)).await;

    let err = transport_for(&base_url).send("hello").await.unwrap_err();
    assert_eq!(err, SendError::Server { status: 502 });
}

#[tokio::test]
async fn throttling_maps_to_rate_limit() {
    let base_url = spawn_backend(status_backend(StatusCode::TOO_MANY_REQUESTS)).await;

    let err = transport_for(&base_url).send("hello").await.unwrap_err();
    assert_eq!(err, SendError::RateLimit);
}

#[tokio::test]
async fn other_client_errors_are_generic() {
    let base_url = spawn_backend(status_backend(StatusCode::UNAUTHORIZED)).await;

    let err = transport_for(&base_url).send("hello").await.unwrap_err();
    assert_eq!(err, SendError::Generic);
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let err = transport_for(&unreachable_base_url())
        .send("hello")
        .await
        .unwrap_err();
    assert_eq!(err, SendError::Network);
}

#[tokio::test]
async fn slow_backend_times_out_as_generic() {
    let router = Router::new().route(
        "/api/chat",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({ "reply": "too late" }))
        }),
    );
    let base_url = spawn_backend(router).await;

    let config = ClientConfig::new(&base_url).with_timeout(Duration::from_millis(200));
    let transport = HttpTransport::new(&config).unwrap();

    let err = transport.send("hello").await.unwrap_err();
    assert_eq!(err, SendError::Generic);
}
