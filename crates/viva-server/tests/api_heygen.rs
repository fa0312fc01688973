mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use viva_server::app;
use wiremock::matchers::{body_json, header, method, path};
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
async fn new_session_without_token_is_bad_request() {
    let upstream = MockServer::start().await;

    let response = app(common::state_for(&upstream))
        .oneshot(post_json("/api/heygen/new_session", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("token"));
    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn session_calls_require_session_id() {
    let upstream = MockServer::start().await;
    let app = app(common::state_for(&upstream));

    for uri in ["/api/heygen/start_session", "/api/heygen/stop_session"] {
        let response = app
            .clone()
            .oneshot(post_json(uri, json!({"token": "tkn"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = read_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("session_id"), "{uri}");
    }
}

#[tokio::test]
async fn create_token_uses_api_key() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/streaming.create_token"))
        .and(header("X-Api-Key", "heygen-test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"token": "tkn_1"}})),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let response = app(common::state_for(&upstream))
        .oneshot(post_json("/api/heygen/create_token", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["data"]["token"], "tkn_1");
}

#[tokio::test]
async fn new_session_passes_provider_reply_through() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/streaming.new"))
        .and(header("Authorization", "Bearer tkn_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"session_id": "sid_1", "url": "wss://livekit.example", "access_token": "lk"}
        })))
        .mount(&upstream)
        .await;

    let response = app(common::state_for(&upstream))
        .oneshot(post_json("/api/heygen/new_session", json!({"token": "tkn_1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["session_id"], "sid_1");
    assert_eq!(body["data"]["url"], "wss://livekit.example");
}

#[tokio::test]
async fn new_session_without_livekit_url_is_bad_gateway() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/streaming.new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"session_id": "sid_1"}})))
        .mount(&upstream)
        .await;

    let response = app(common::state_for(&upstream))
        .oneshot(post_json("/api/heygen/new_session", json!({"token": "tkn_1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("LiveKit URL"));
}

#[tokio::test]
async fn start_session_passes_through_not_found() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/streaming.start"))
        .and(body_json(json!({"session_id": "sid_gone"})))
        .respond_with(ResponseTemplate::new(404).set_body_string("session not found"))
        .mount(&upstream)
        .await;

    let response = app(common::state_for(&upstream))
        .oneshot(post_json(
            "/api/heygen/start_session",
            json!({"token": "tkn_1", "session_id": "sid_gone"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("session not found"));
}

#[tokio::test]
async fn stop_session_maps_server_error_to_bad_gateway() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/streaming.stop"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&upstream)
        .await;

    let response = app(common::state_for(&upstream))
        .oneshot(post_json(
            "/api/heygen/stop_session",
            json!({"token": "tkn_1", "session_id": "sid_1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn task_reports_provider_status() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/streaming.task"))
        .and(body_json(json!({
            "session_id": "sid_1",
            "task_type": "repeat",
            "text": "Hello, welcome to the interview."
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&upstream)
        .await;

    let response = app(common::state_for(&upstream))
        .oneshot(post_json(
            "/api/heygen/task",
            json!({
                "token": "tkn_1",
                "session_id": "sid_1",
                "task_type": "repeat",
                "text": "Hello, welcome to the interview."
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body, json!({"status": "ok", "heygen_status_code": 202}));
}

#[tokio::test]
async fn initiate_session_runs_full_handshake() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/streaming.create_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"token": "tkn_9"}})))
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/streaming.new"))
        .and(header("Authorization", "Bearer tkn_9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"session_id": "sid_9", "url": "wss://lk.example", "access_token": "lk_tok"}
        })))
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/streaming.start"))
        .and(body_json(json!({"session_id": "sid_9"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 100})))
        .expect(1)
        .mount(&upstream)
        .await;

    let response = app(common::state_for(&upstream))
        .oneshot(post_json("/api/heygen/initiate_session", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["session_id"], "sid_9");
    assert_eq!(body["token"], "tkn_9");
    assert_eq!(body["livekit_connection"]["server_url"], "wss://lk.example");
    assert_eq!(body["livekit_connection"]["token"], "lk_tok");
}
