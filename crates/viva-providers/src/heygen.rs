//! Client for the avatar streaming provider.
//!
//! Streaming calls are authorized with a short-lived session token minted from
//! the account API key by [`HeyGenClient::create_token`]; every other call
//! carries that token as a bearer credential.

use crate::config::HeyGenConfig;
use crate::error::ProviderError;
use crate::http::{build_client, endpoint, read_json};
use serde_json::{json, Value};
use std::time::Duration;
use viva_types::{InitiateSessionResponse, LiveKitConnection};

const PROVIDER: &str = "HeyGen";

#[derive(Debug, Clone)]
pub struct HeyGenClient {
    config: HeyGenConfig,
    http: reqwest::Client,
}

impl HeyGenClient {
    pub fn new(config: HeyGenConfig) -> Result<Self, ProviderError> {
        let http = build_client(Duration::from_secs(config.timeout_secs))?;
        Ok(Self { config, http })
    }

    pub fn is_enabled(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Request body for `streaming.new`, built from the configured avatar.
    pub fn new_session_body(&self) -> Value {
        json!({
            "quality": self.config.quality,
            "avatar_name": self.config.avatar_name,
            "voice": { "rate": self.config.voice_rate },
            "video_encoding": self.config.video_encoding,
            "disable_idle_timeout": false,
            "version": "v2",
            "stt_settings": {
                "provider": self.config.stt_provider,
                "confidence": self.config.stt_confidence,
            },
            "activity_idle_timeout": self.config.activity_idle_timeout_secs,
        })
    }

    /// Mints a streaming session token from the account API key.
    pub async fn create_token(&self) -> Result<Value, ProviderError> {
        if !self.is_enabled() {
            return Err(ProviderError::Config("HEYGEN_API_KEY is not set".to_string()));
        }

        let response = self
            .http
            .post(endpoint(&self.config.base_url, "/v1/streaming.create_token"))
            .header("X-Api-Key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;
        read_json(PROVIDER, response).await
    }

    /// Creates an inactive streaming session. The reply must carry the LiveKit
    /// room URL under `data.url`.
    pub async fn new_session(&self, token: &str) -> Result<Value, ProviderError> {
        let body = self
            .post_streaming("/v1/streaming.new", token, &self.new_session_body())
            .await?;
        if data_str(&body, "url").is_none() {
            return Err(ProviderError::invalid(
                PROVIDER,
                "response is missing the LiveKit URL",
            ));
        }
        Ok(body)
    }

    pub async fn start_session(&self, token: &str, session_id: &str) -> Result<Value, ProviderError> {
        self.post_streaming(
            "/v1/streaming.start",
            token,
            &json!({ "session_id": session_id }),
        )
        .await
    }

    pub async fn stop_session(&self, token: &str, session_id: &str) -> Result<Value, ProviderError> {
        self.post_streaming(
            "/v1/streaming.stop",
            token,
            &json!({ "session_id": session_id }),
        )
        .await
    }

    /// Sends a speak task and reports the provider's HTTP status without
    /// judging it; only transport failures are errors.
    pub async fn send_task(
        &self,
        token: &str,
        session_id: &str,
        task_type: &str,
        text: &str,
    ) -> Result<u16, ProviderError> {
        let payload = json!({
            "session_id": session_id,
            "task_type": task_type,
            "text": text,
        });
        tracing::debug!(session_id, task_type, "sending avatar task");

        let response = self
            .http
            .post(endpoint(&self.config.base_url, "/v1/streaming.task"))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;
        Ok(response.status().as_u16())
    }

    /// Runs token creation, session creation and session start in one go and
    /// returns only what the browser needs to join the stream.
    pub async fn initiate_session(&self) -> Result<InitiateSessionResponse, ProviderError> {
        let token_reply = self.create_token().await?;
        let token = data_str(&token_reply, "token")
            .ok_or_else(|| ProviderError::invalid(PROVIDER, "token reply is missing data.token"))?
            .to_string();

        let session = self.new_session(&token).await?;
        let (Some(session_id), Some(server_url), Some(access_token)) = (
            data_str(&session, "session_id"),
            data_str(&session, "url"),
            data_str(&session, "access_token"),
        ) else {
            return Err(ProviderError::invalid(
                PROVIDER,
                "new session response is missing session_id, url or access_token",
            ));
        };

        self.start_session(&token, session_id).await?;
        tracing::info!(session_id, "avatar streaming session started");

        Ok(InitiateSessionResponse {
            message: "HeyGen session successfully initiated.".to_string(),
            session_id: session_id.to_string(),
            token,
            livekit_connection: LiveKitConnection {
                server_url: server_url.to_string(),
                token: access_token.to_string(),
            },
        })
    }

    async fn post_streaming(&self, path: &str, token: &str, body: &Value) -> Result<Value, ProviderError> {
        let response = self
            .http
            .post(endpoint(&self.config.base_url, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;
        read_json(PROVIDER, response).await
    }
}

/// Reads a non-empty string from the provider's `data` envelope.
fn data_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get("data")?
        .get(field)?
        .as_str()
        .filter(|s| !s.is_empty())
}
