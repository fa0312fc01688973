//! Interview lifecycle endpoints called by the browser and the workflow engine.

use crate::api::{json_body, require, ApiError};
use crate::relay::Delivery;
use crate::AppState;
use axum::extract::{rejection::JsonRejection, Extension, Json};
use std::sync::Arc;
use viva_types::{
    EndInterviewRequest, SendQuestionRequest, ServerMessage, StartInterviewRequest,
    StartInterviewResponse, StatusResponse,
};

/// Handler for `POST /api/interview/start`.
///
/// Asks the workflow engine to open an interview for the booking code and
/// records the returned resume URL under the new session id.
pub async fn start_interview_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<StartInterviewRequest>, JsonRejection>,
) -> Result<Json<StartInterviewResponse>, ApiError> {
    let request = json_body(body)?;
    let booking_code = require(&request.booking_code, "booking_code")?;
    tracing::info!(booking_code = %booking_code, "starting interview");

    let session = state
        .workflow
        .start_interview(booking_code)
        .await
        .map_err(|e| {
            tracing::warn!(booking_code = %booking_code, "workflow engine refused to start interview: {}", e);
            ApiError::upstream(e)
        })?;

    state
        .sessions
        .create(session.session_id.clone(), session.resume_url.clone());
    tracing::info!(
        session_id = %session.session_id,
        resume_url = %session.resume_url,
        "interview session started"
    );

    Ok(Json(StartInterviewResponse {
        session_id: session.session_id,
        resume_url: session.resume_url,
    }))
}

/// Handler for `POST /api/send-question`.
///
/// Succeeds whether or not the candidate's socket is connected; a miss is
/// logged by the relay and the question is lost.
pub async fn send_question_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<SendQuestionRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let request = json_body(body)?;
    let session_id = require(&request.session_id, "sessionId")?;
    let question = require(&request.question, "question")?;

    let delivery = state
        .relay
        .send(session_id, &ServerMessage::new_question(question))
        .await;
    if let Delivery::Delivered = delivery {
        tracing::info!(session_id = %session_id, "question sent to client");
    }

    Ok(Json(StatusResponse::new("Question sent to client.")))
}

/// Handler for `POST /api/interview/end`.
///
/// Forgets the session and tells the client to wrap up. The socket itself is
/// left for the client to close.
pub async fn end_interview_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<EndInterviewRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let request = json_body(body)?;
    let session_id = require(&request.session_id, "sessionId")?;

    let removed = state.sessions.remove(session_id);
    tracing::info!(session_id = %session_id, removed, "ending interview");

    state
        .relay
        .send(session_id, &ServerMessage::EndInterview)
        .await;

    Ok(Json(StatusResponse::new("End interview command sent.")))
}
