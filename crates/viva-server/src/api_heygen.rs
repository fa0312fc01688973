//! Proxies for the avatar streaming provider.
//!
//! The account API key stays on the server; the browser only ever sees the
//! short-lived streaming token minted by `create_token`.

use crate::api::{json_body, require, ApiError};
use crate::AppState;
use axum::extract::{rejection::JsonRejection, Extension, Json};
use serde_json::Value;
use std::sync::Arc;
use viva_types::{HeyGenSessionRequest, HeyGenTaskRequest, HeyGenTaskResponse, InitiateSessionResponse};

/// Handler for `POST /api/heygen/create_token`.
pub async fn create_token_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    let reply = state.heygen.create_token().await.map_err(|e| {
        tracing::warn!("avatar token creation failed: {}", e);
        ApiError::upstream(e)
    })?;
    Ok(Json(reply))
}

/// Handler for `POST /api/heygen/new_session`.
pub async fn new_session_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<HeyGenSessionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = json_body(body)?;
    let token = require(&request.token, "token")?;

    let reply = state.heygen.new_session(token).await.map_err(|e| {
        tracing::warn!("avatar session creation failed: {}", e);
        ApiError::upstream(e)
    })?;
    Ok(Json(reply))
}

/// Handler for `POST /api/heygen/start_session`.
///
/// An upstream 404 (unknown streaming session) is passed through as 404.
pub async fn start_session_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<HeyGenSessionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = json_body(body)?;
    let token = require(&request.token, "token")?;
    let session_id = require(&request.session_id, "session_id")?;

    let reply = state
        .heygen
        .start_session(token, session_id)
        .await
        .map_err(|e| {
            tracing::warn!(session_id = %session_id, "avatar session start failed: {}", e);
            ApiError::from(e)
        })?;
    Ok(Json(reply))
}

/// Handler for `POST /api/heygen/stop_session`.
pub async fn stop_session_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<HeyGenSessionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = json_body(body)?;
    let token = require(&request.token, "token")?;
    let session_id = require(&request.session_id, "session_id")?;

    let reply = state
        .heygen
        .stop_session(token, session_id)
        .await
        .map_err(|e| {
            tracing::warn!(session_id = %session_id, "avatar session stop failed: {}", e);
            ApiError::from(e)
        })?;
    Ok(Json(reply))
}

/// Handler for `POST /api/heygen/task`.
///
/// Reports the provider's status code rather than failing on it.
pub async fn task_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<HeyGenTaskRequest>, JsonRejection>,
) -> Result<Json<HeyGenTaskResponse>, ApiError> {
    let request = json_body(body)?;
    let token = require(&request.token, "token")?;
    let session_id = require(&request.session_id, "session_id")?;
    let text = require(&request.text, "text")?;

    let status = state
        .heygen
        .send_task(token, session_id, &request.task_type, text)
        .await
        .map_err(ApiError::upstream)?;

    Ok(Json(HeyGenTaskResponse {
        status: "ok".to_string(),
        heygen_status_code: status,
    }))
}

/// Handler for `POST /api/heygen/initiate_session`.
///
/// Creates a token, opens a session and starts it in one call.
pub async fn initiate_session_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<InitiateSessionResponse>, ApiError> {
    let session = state.heygen.initiate_session().await.map_err(|e| {
        tracing::warn!("avatar session initiation failed: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(session))
}
