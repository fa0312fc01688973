//! Shared wire types for the Viva interview relay.
//!
//! This crate holds the message shapes exchanged with the browser over the
//! interview WebSocket and the JSON bodies of every HTTP route. It performs no
//! I/O, so both the server and the provider clients can depend on it without
//! pulling in a runtime.

pub mod api;
pub mod messages;

pub use api::{
    EndInterviewRequest, ErrorResponse, HeyGenSessionRequest, HeyGenTaskRequest,
    HeyGenTaskResponse, InitiateSessionResponse, LiveKitConnection, SendQuestionRequest,
    StartInterviewRequest, StartInterviewResponse, StatusResponse,
};
pub use messages::{AnswerPayload, ClientMessage, QuestionPayload, ServerMessage};
