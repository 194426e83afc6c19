//! HTTP surface tests: routing, status codes, and the JSON envelopes.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{make_state, thread, StubCompletion, StubRecords};
use tr_gateway::api;

async fn send(state: tr_gateway::state::AppState, body: Value) -> (StatusCode, Value) {
    let app = api::router().with_state(state);
    let request = Request::builder()
        .method("POST")
        .uri("/assist/thread-chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn liveness_endpoint_answers() {
    let state = make_state(StubCompletion::replying("unused"), StubRecords::empty());
    let app = api::router().with_state(state);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8(bytes.to_vec())
        .unwrap()
        .contains("ThreadRelay"));
}

#[tokio::test]
async fn thread_mode_request_returns_the_rendered_reply() {
    let state = make_state(
        StubCompletion::replying("hi there"),
        StubRecords::with_threads(vec![thread("42", None, vec![])]),
    );

    let (status, body) = send(
        state,
        json!({"chatRecordId": "42", "message": "hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"reply": "<p>hi there</p>"}));
}

#[tokio::test]
async fn message_list_request_returns_the_rendered_reply() {
    let state = make_state(StubCompletion::replying("hi there"), StubRecords::empty());

    let (status, body) = send(
        state,
        json!({"messages": [{"role": "user", "content": "hello"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "<p>hi there</p>");
}

#[tokio::test]
async fn empty_body_is_a_400_with_error_envelope() {
    let state = make_state(StubCompletion::replying("unused"), StubRecords::empty());

    let (status, body) = send(state, json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_role_is_a_400() {
    let state = make_state(StubCompletion::replying("unused"), StubRecords::empty());

    let (status, body) = send(
        state,
        json!({"messages": [{"role": "wizard", "content": "hello"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid request"));
}

#[tokio::test]
async fn missing_thread_is_a_500() {
    let state = make_state(StubCompletion::replying("unused"), StubRecords::empty());

    let (status, body) = send(
        state,
        json!({"chatRecordId": "404", "message": "hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn upstream_failure_is_a_500() {
    let state = make_state(
        StubCompletion::failing(),
        StubRecords::with_threads(vec![thread("42", None, vec![])]),
    );

    let (status, body) = send(
        state,
        json!({"chatRecordId": "42", "message": "hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}
