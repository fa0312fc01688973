use crate::config::GladiaConfig;
use crate::error::ProviderError;
use crate::http::{build_client, endpoint, read_json};
use serde_json::Value;
use std::time::Duration;

const PROVIDER: &str = "Gladia";

/// Client for the live transcription provider.
///
/// The browser streams audio to Gladia directly; this server only opens the
/// live session so the API key never reaches the client.
#[derive(Debug, Clone)]
pub struct GladiaClient {
    config: GladiaConfig,
    http: reqwest::Client,
}

impl GladiaClient {
    pub fn new(config: GladiaConfig) -> Result<Self, ProviderError> {
        let http = build_client(Duration::from_secs(config.timeout_secs))?;
        Ok(Self { config, http })
    }

    pub fn is_enabled(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Opens a live transcription session. `settings` is forwarded verbatim and
    /// the provider's reply (session id and socket URL) is returned as-is.
    pub async fn init_live_session(&self, settings: &Value) -> Result<Value, ProviderError> {
        if !self.is_enabled() {
            return Err(ProviderError::Config("GLADIA_API_KEY is not set".to_string()));
        }

        let response = self
            .http
            .post(endpoint(&self.config.base_url, "/v2/live"))
            .header("X-Gladia-Key", &self.config.api_key)
            .json(settings)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        let body = read_json(PROVIDER, response).await?;
        let session = body.get("id").and_then(|v| v.as_str()).unwrap_or("<none>");
        tracing::info!(session, "opened live transcription session");
        Ok(body)
    }
}
