//! HTTP request and response bodies.
//!
//! Fields the caller is required to send are still `Option`s: handlers check
//! them explicitly so a missing field produces a 400 that names it.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/interview/start`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartInterviewRequest {
    #[serde(default)]
    pub booking_code: Option<String>,
}

/// Response of `POST /api/interview/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartInterviewResponse {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "resumeUrl")]
    pub resume_url: String,
}

/// Body of `POST /api/send-question`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendQuestionRequest {
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
}

/// Body of `POST /api/interview/end`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndInterviewRequest {
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of the HeyGen `new_session`, `start_session` and `stop_session`
/// proxies. `new_session` only reads `token`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeyGenSessionRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Body of `POST /api/heygen/task`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeyGenTaskRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default = "default_task_type")]
    pub task_type: String,
}

fn default_task_type() -> String {
    "text".to_string()
}

/// Response of `POST /api/heygen/task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeyGenTaskResponse {
    pub status: String,
    pub heygen_status_code: u16,
}

/// LiveKit room details the browser needs to join the avatar stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveKitConnection {
    pub server_url: String,
    pub token: String,
}

/// Response of `POST /api/heygen/initiate_session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiateSessionResponse {
    pub message: String,
    pub session_id: String,
    /// Streaming token for later `task` / `stop_session` calls.
    pub token: String,
    pub livekit_connection: LiveKitConnection,
}
