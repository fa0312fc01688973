mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use viva_server::app;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn start_interview_registers_session() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/starts-interview"))
        .and(body_json(json!({"booking_code": "BKNG-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessionId": "s1",
            "resumeUrl": "https://wf/resume/s1"
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let state = common::state_for(&upstream);
    let sessions = state.sessions.clone();

    let response = app(state)
        .oneshot(post_json(
            "/api/interview/start",
            json!({"booking_code": "BKNG-1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["sessionId"], "s1");
    assert_eq!(body["resumeUrl"], "https://wf/resume/s1");
    assert_eq!(sessions.get("s1").as_deref(), Some("https://wf/resume/s1"));
}

#[tokio::test]
async fn start_interview_requires_booking_code() {
    let upstream = MockServer::start().await;
    let state = common::state_for(&upstream);

    let response = app(state)
        .oneshot(post_json("/api/interview/start", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("booking_code"));
    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn start_interview_rejects_reply_without_resume_url() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/starts-interview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sessionId": "s1"})))
        .mount(&upstream)
        .await;

    let state = common::state_for(&upstream);
    let sessions = state.sessions.clone();

    let response = app(state)
        .oneshot(post_json(
            "/api/interview/start",
            json!({"booking_code": "BKNG-1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("resumeUrl"));
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn start_interview_surfaces_upstream_failure() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/starts-interview"))
        .respond_with(ResponseTemplate::new(500).set_body_string("workflow not active"))
        .mount(&upstream)
        .await;

    let response = app(common::state_for(&upstream))
        .oneshot(post_json(
            "/api/interview/start",
            json!({"booking_code": "BKNG-1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("workflow not active"));
}

#[tokio::test]
async fn malformed_json_body_gets_json_error() {
    let upstream = MockServer::start().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/interview/start")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app(common::state_for(&upstream))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn send_question_without_connection_still_succeeds() {
    let upstream = MockServer::start().await;

    let response = app(common::state_for(&upstream))
        .oneshot(post_json(
            "/api/send-question",
            json!({"sessionId": "nobody", "question": "Tell me about yourself"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "Question sent to client.");
}

#[tokio::test]
async fn send_question_requires_session_id() {
    let upstream = MockServer::start().await;

    let response = app(common::state_for(&upstream))
        .oneshot(post_json("/api/send-question", json!({"question": "Hi"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("sessionId"));
}

#[tokio::test]
async fn end_interview_removes_session() {
    let upstream = MockServer::start().await;
    let state = common::state_for(&upstream);
    state.sessions.create("s1", "https://wf/resume/s1");
    state.sessions.create("s2", "https://wf/resume/s2");
    let sessions = state.sessions.clone();

    let response = app(state)
        .oneshot(post_json("/api/interview/end", json!({"sessionId": "s1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "End interview command sent.");
    assert_eq!(sessions.get("s1"), None);
    assert_eq!(sessions.get("s2").as_deref(), Some("https://wf/resume/s2"));
}

#[tokio::test]
async fn end_unknown_session_is_harmless() {
    let upstream = MockServer::start().await;

    let response = app(common::state_for(&upstream))
        .oneshot(post_json("/api/interview/end", json!({"sessionId": "ghost"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_check_returns_ok() {
    let upstream = MockServer::start().await;

    let response = app(common::state_for(&upstream))
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
}
