//! Integration tests for the SSE router.

use axum::body::{Body, BodyDataStream};
use axum::http::{Request, StatusCode};
use booklib_core::{GatewayConfig, LibraryGateway};
use booklib_mcp::{build_router, McpHandler, SseState};
use futures::StreamExt;
use tower::ServiceExt;

fn make_state(dir: &tempfile::TempDir) -> SseState {
    SseState::new(McpHandler::library(LibraryGateway::new(GatewayConfig::new(
        dir.path().join("library.db"),
    ))))
}

async fn next_event(stream: &mut BodyDataStream) -> String {
    loop {
        let chunk = stream
            .next()
            .await
            .expect("stream ended")
            .expect("body error");
        let text = String::from_utf8(chunk.to_vec()).expect("utf8");
        // Keep-alive comments start with ':'.
        if !text.starts_with(':') {
            return text;
        }
    }
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("req")
}

#[tokio::test]
async fn health_returns_ok() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(make_state(&dir));
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("req");
    let resp = app.oneshot(req).await.expect("resp");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), 1024).await.expect("body");
    assert!(String::from_utf8_lossy(&body).contains("sqlite-book-library"));
}

#[tokio::test]
async fn stream_announces_endpoint_then_carries_responses() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let app = build_router(state.clone());

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/sse").body(Body::empty()).expect("req"))
        .await
        .expect("resp");
    assert_eq!(resp.status(), StatusCode::OK);
    let mut stream = resp.into_body().into_data_stream();

    let announce = next_event(&mut stream).await;
    assert!(announce.starts_with("event: endpoint\n"), "{announce}");
    let endpoint = announce
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .expect("endpoint data")
        .to_string();
    assert!(endpoint.starts_with("/messages/?session_id="));
    assert_eq!(state.sessions.len(), 1);

    let resp = app
        .clone()
        .oneshot(post(
            &endpoint,
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"get_books","arguments":{}}}"#,
        ))
        .await
        .expect("resp");
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let message = next_event(&mut stream).await;
    assert!(message.starts_with("event: message\n"), "{message}");
    let data = message
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .expect("message data");
    let value: serde_json::Value = serde_json::from_str(data).expect("json");
    assert_eq!(value["id"], 5);
    assert_eq!(value["result"]["content"], serde_json::json!([]));

    drop(stream);
    assert!(state.sessions.is_empty());
}

#[tokio::test]
async fn notifications_are_accepted_without_a_stream_message() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let (session_id, mut rx) = state.sessions.open();
    let app = build_router(state);

    let resp = app
        .oneshot(post(
            &format!("/messages/?session_id={session_id}"),
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        ))
        .await
        .expect("resp");
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(make_state(&dir));
    let resp = app
        .oneshot(post(
            "/messages/?session_id=deadbeef",
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
        ))
        .await
        .expect("resp");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_session_id_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(make_state(&dir));
    let resp = app
        .oneshot(post("/messages/", r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
        .await
        .expect("resp");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let (session_id, _rx) = state.sessions.open();
    let app = build_router(state);

    let resp = app
        .oneshot(post(&format!("/messages/?session_id={session_id}"), "not json"))
        .await
        .expect("resp");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
