//! Client for the workflow engine that drives the interview.
//!
//! The engine opens an interview for a booking code and hands back a resume
//! URL; every transcribed answer is then POSTed to that URL so the paused
//! workflow can pick its next question.

use crate::config::WorkflowConfig;
use crate::error::ProviderError;
use crate::http::{build_client, ensure_success, read_json};
use serde::{Deserialize, Serialize};
use url::Url;

const PROVIDER: &str = "workflow engine";

/// A session the workflow engine has opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSession {
    pub session_id: String,
    pub resume_url: String,
}

#[derive(Debug, Deserialize)]
struct StartReply {
    #[serde(rename = "sessionId", default)]
    session_id: Option<String>,
    #[serde(rename = "resumeUrl", default)]
    resume_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct StartBody<'a> {
    booking_code: &'a str,
}

#[derive(Debug, Serialize)]
struct AnswerBody<'a> {
    #[serde(rename = "sessionId")]
    session_id: &'a str,
    answer: &'a str,
}

#[derive(Debug, Clone)]
pub struct WorkflowClient {
    config: WorkflowConfig,
    start_http: reqwest::Client,
    forward_http: reqwest::Client,
}

impl WorkflowClient {
    /// Builds one HTTP client per timeout class: the long-running start call
    /// and the short answer forward.
    pub fn new(config: WorkflowConfig) -> Result<Self, ProviderError> {
        let start_http = build_client(config.start_timeout())?;
        let forward_http = build_client(config.forward_timeout())?;
        Ok(Self {
            config,
            start_http,
            forward_http,
        })
    }

    /// Asks the workflow engine to open an interview for `booking_code`.
    ///
    /// # Errors
    ///
    /// `Status` on a non-2xx reply, `InvalidResponse` if the reply lacks a
    /// `sessionId` or an absolute http(s) `resumeUrl`.
    pub async fn start_interview(&self, booking_code: &str) -> Result<WorkflowSession, ProviderError> {
        tracing::debug!(url = %self.config.start_url, "requesting new interview session");

        let response = self
            .start_http
            .post(&self.config.start_url)
            .json(&StartBody { booking_code })
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        let body = read_json(PROVIDER, response).await?;
        let reply: StartReply = serde_json::from_value(body)
            .map_err(|e| ProviderError::invalid(PROVIDER, format!("unexpected reply shape: {e}")))?;

        let session_id = reply
            .session_id
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ProviderError::invalid(PROVIDER, "reply is missing sessionId"))?;
        let resume_url = reply
            .resume_url
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ProviderError::invalid(PROVIDER, "reply is missing resumeUrl"))?;
        validate_resume_url(&resume_url)?;

        Ok(WorkflowSession {
            session_id,
            resume_url,
        })
    }

    /// POSTs `{sessionId, answer}` to a session's resume URL.
    ///
    /// # Errors
    ///
    /// `Transport` on timeout or connection failure, `Status` on a non-2xx reply.
    pub async fn forward_answer(
        &self,
        resume_url: &str,
        session_id: &str,
        answer: &str,
    ) -> Result<(), ProviderError> {
        let response = self
            .forward_http
            .post(resume_url)
            .json(&AnswerBody { session_id, answer })
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;
        ensure_success(PROVIDER, response).await?;
        Ok(())
    }
}

fn validate_resume_url(raw: &str) -> Result<(), ProviderError> {
    let parsed = Url::parse(raw)
        .map_err(|e| ProviderError::invalid(PROVIDER, format!("resumeUrl is not a URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ProviderError::invalid(
            PROVIDER,
            format!("resumeUrl has unsupported scheme: {other}"),
        )),
    }
}
