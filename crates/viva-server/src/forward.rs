//! Forwarding of transcribed answers to the workflow engine.
//!
//! A forward is fire-and-forget from the candidate's point of view. Failures
//! are returned as [`ForwardError`] and then handed to [`log_and_continue`],
//! which is the single place the relay decides what a failed forward means:
//! it is logged and dropped, never retried. The workflow engine's own
//! timeouts decide how the interview proceeds.

use crate::registry::SessionRegistry;
use std::sync::Arc;
use thiserror::Error;
use viva_providers::{ProviderError, WorkflowClient};

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("no open session '{0}' (ended or never started)")]
    UnknownSession(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Resolves a session's resume URL and POSTs answers to it.
#[derive(Clone)]
pub struct AnswerForwarder {
    sessions: SessionRegistry,
    workflow: Arc<WorkflowClient>,
}

impl AnswerForwarder {
    pub fn new(sessions: SessionRegistry, workflow: Arc<WorkflowClient>) -> Self {
        Self { sessions, workflow }
    }

    /// Sends `{sessionId, answer}` to the session's resume URL, bounded by the
    /// workflow client's forward timeout.
    ///
    /// # Errors
    ///
    /// `UnknownSession` when the registry has no entry, `Provider` when the
    /// POST fails or the engine answers with a non-2xx status.
    pub async fn forward(&self, session_id: &str, answer: &str) -> Result<(), ForwardError> {
        let resume_url = self
            .sessions
            .get(session_id)
            .ok_or_else(|| ForwardError::UnknownSession(session_id.to_string()))?;

        tracing::info!(
            session_id = %session_id,
            resume_url = %resume_url,
            answer_len = answer.len(),
            "forwarding answer to workflow engine"
        );
        self.workflow
            .forward_answer(&resume_url, session_id, answer)
            .await?;
        Ok(())
    }
}

/// Logs a forward result and discards it. A failed forward never ends the
/// connection.
pub fn log_and_continue(session_id: &str, result: Result<(), ForwardError>) {
    match result {
        Ok(()) => {
            tracing::debug!(session_id = %session_id, "answer forwarded");
        }
        Err(ForwardError::UnknownSession(_)) => {
            tracing::warn!(
                session_id = %session_id,
                "dropping answer: session has no resume URL (ended or never started)"
            );
        }
        Err(ForwardError::Provider(e)) => {
            tracing::warn!(
                session_id = %session_id,
                timeout = e.is_timeout(),
                "failed to forward answer to workflow engine: {}",
                e
            );
        }
    }
}
