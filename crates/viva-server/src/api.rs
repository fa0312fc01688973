//! Shared HTTP error type and request-body helpers.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use viva_providers::ProviderError;
use viva_types::ErrorResponse;

/// API error type mapping to HTTP status codes.
///
/// Every variant renders as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("upstream error: {0}")]
    BadGateway(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// A required request field was absent or blank.
    pub fn missing_field(field: &str) -> Self {
        Self::BadRequest(format!("missing required field '{field}'"))
    }

    /// Maps a provider failure to 502 regardless of the upstream status.
    /// Use `From` instead where an upstream 404 should pass through.
    pub fn upstream(e: ProviderError) -> Self {
        match e {
            ProviderError::Config(msg) => ApiError::Internal(msg),
            e => ApiError::BadGateway(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Config(msg) => ApiError::Internal(msg),
            e if e.is_not_found() => ApiError::NotFound(e.to_string()),
            e => ApiError::BadGateway(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Unwraps an optional JSON body extractor, turning axum's plain-text
/// rejection into a JSON 400.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(ApiError::from)
}

/// Returns the field's value, or a 400 naming it when absent or blank.
pub fn require<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::missing_field(field))
}
