//! Frames carried on the interview WebSocket.
//!
//! Every frame is a JSON object discriminated by its `type` field. The server
//! pushes [`ServerMessage`]s; the browser sends [`ClientMessage`]s.

use serde::{Deserialize, Serialize};

/// Body of a `new_question` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPayload {
    pub text: String,
}

/// Server-to-client frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A question the avatar should ask next.
    NewQuestion { payload: QuestionPayload },
    /// The workflow engine closed the interview.
    EndInterview,
    /// The last frame the client sent could not be understood.
    Error { message: String },
}

impl ServerMessage {
    pub fn new_question(text: impl Into<String>) -> Self {
        Self::NewQuestion {
            payload: QuestionPayload { text: text.into() },
        }
    }

    /// Returns the `type` tag, for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NewQuestion { .. } => "new_question",
            Self::EndInterview => "end_interview",
            Self::Error { .. } => "error",
        }
    }
}

/// Body of a `user_answer` frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnswerPayload {
    #[serde(default)]
    pub answer: Option<String>,
}

/// Client-to-server frame.
///
/// Frames whose `type` is not recognized (keepalives, transcription partials the
/// browser chooses to echo, ...) deserialize to [`ClientMessage::Unrecognized`]
/// and are ignored by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "user_answer")]
    UserAnswer {
        #[serde(default)]
        payload: AnswerPayload,
    },
    #[serde(other)]
    Unrecognized,
}

impl ClientMessage {
    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the text is not a JSON object with a `type`
    /// field, or when a `user_answer` frame carries a payload of the wrong shape.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Returns the transcribed answer if this is a `user_answer` frame with a
    /// non-blank answer.
    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::UserAnswer { payload } => payload
                .answer
                .as_deref()
                .filter(|answer| !answer.trim().is_empty()),
            Self::Unrecognized => None,
        }
    }
}
