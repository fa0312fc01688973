//! Shared plumbing for the provider clients.

use crate::error::ProviderError;
use serde_json::Value;
use std::time::Duration;

/// Upstream error bodies are echoed to callers; cap what we keep.
const MAX_ERROR_BODY_CHARS: usize = 2_048;

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("viva-relay/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::Config(format!("failed to build HTTP client: {e}")))
}

/// Joins a configured base URL and an API path without doubling slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Fails with [`ProviderError::Status`] on a non-2xx response.
pub(crate) async fn ensure_success(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.chars().count() > MAX_ERROR_BODY_CHARS {
        body = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    }
    tracing::warn!(
        provider,
        status = status.as_u16(),
        "upstream returned an error status"
    );
    Err(ProviderError::Status {
        provider,
        status: status.as_u16(),
        body,
    })
}

/// Checks the status and decodes the body as JSON.
pub(crate) async fn read_json(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<Value, ProviderError> {
    let response = ensure_success(provider, response).await?;
    response
        .json::<Value>()
        .await
        .map_err(|e| ProviderError::invalid(provider, format!("body is not JSON: {e}")))
}
