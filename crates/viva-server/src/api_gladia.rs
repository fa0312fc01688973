use crate::api::{json_body, ApiError};
use crate::AppState;
use axum::extract::{rejection::JsonRejection, Extension, Json};
use serde_json::Value;
use std::sync::Arc;

/// Handler for `POST /api/gladia/init`.
///
/// Opens a live transcription session with the caller's settings and returns
/// the provider's reply unchanged.
pub async fn gladia_init_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let settings = json_body(body)?;
    let reply = state
        .gladia
        .init_live_session(&settings)
        .await
        .map_err(|e| {
            tracing::warn!("transcription session init failed: {}", e);
            ApiError::upstream(e)
        })?;
    Ok(Json(reply))
}
