use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

fn default_start_url() -> String {
    "http://localhost:5678/webhook/starts-interview".to_string()
}

fn default_start_timeout_secs() -> u64 {
    30
}

fn default_forward_timeout_secs() -> u64 {
    10
}

fn default_provider_timeout_secs() -> u64 {
    30
}

fn default_gladia_url() -> String {
    "https://api.gladia.io".to_string()
}

fn default_heygen_url() -> String {
    "https://api.heygen.com".to_string()
}

fn default_avatar_name() -> String {
    "Wayne_20240711".to_string()
}

fn default_quality() -> String {
    "medium".to_string()
}

fn default_voice_rate() -> f32 {
    1.0
}

fn default_video_encoding() -> String {
    "VP8".to_string()
}

fn default_stt_provider() -> String {
    "deepgram".to_string()
}

fn default_stt_confidence() -> f32 {
    0.55
}

fn default_activity_idle_timeout_secs() -> u64 {
    120
}

/// Workflow engine endpoints and timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Webhook that opens an interview for a booking code.
    #[serde(default = "default_start_url")]
    pub start_url: String,
    /// Timeout for the start call. Default: 30 seconds.
    #[serde(default = "default_start_timeout_secs")]
    pub start_timeout_secs: u64,
    /// Timeout for each answer forwarded to a resume URL. Default: 10 seconds.
    /// Kept short because the forward runs inside the socket's receive loop.
    #[serde(default = "default_forward_timeout_secs")]
    pub forward_timeout_secs: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            start_url: default_start_url(),
            start_timeout_secs: default_start_timeout_secs(),
            forward_timeout_secs: default_forward_timeout_secs(),
        }
    }
}

impl WorkflowConfig {
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            ..Self::default()
        }
    }

    pub fn start_timeout(&self) -> Duration {
        Duration::from_secs(self.start_timeout_secs)
    }

    pub fn forward_timeout(&self) -> Duration {
        Duration::from_secs(self.forward_timeout_secs)
    }
}

/// Live transcription provider settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct GladiaConfig {
    #[serde(default = "default_gladia_url")]
    pub base_url: String,
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GladiaConfig {
    fn default() -> Self {
        Self {
            base_url: default_gladia_url(),
            api_key: String::new(),
            timeout_secs: default_provider_timeout_secs(),
        }
    }
}

impl fmt::Debug for GladiaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GladiaConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GladiaConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_secs: default_provider_timeout_secs(),
        }
    }
}

/// Avatar streaming provider settings, including the avatar used for new
/// streaming sessions.
#[derive(Clone, Serialize, Deserialize)]
pub struct HeyGenConfig {
    #[serde(default = "default_heygen_url")]
    pub base_url: String,
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_avatar_name")]
    pub avatar_name: String,
    #[serde(default = "default_quality")]
    pub quality: String,
    #[serde(default = "default_voice_rate")]
    pub voice_rate: f32,
    #[serde(default = "default_video_encoding")]
    pub video_encoding: String,
    #[serde(default = "default_stt_provider")]
    pub stt_provider: String,
    #[serde(default = "default_stt_confidence")]
    pub stt_confidence: f32,
    #[serde(default = "default_activity_idle_timeout_secs")]
    pub activity_idle_timeout_secs: u64,
}

impl Default for HeyGenConfig {
    fn default() -> Self {
        Self {
            base_url: default_heygen_url(),
            api_key: String::new(),
            timeout_secs: default_provider_timeout_secs(),
            avatar_name: default_avatar_name(),
            quality: default_quality(),
            voice_rate: default_voice_rate(),
            video_encoding: default_video_encoding(),
            stt_provider: default_stt_provider(),
            stt_confidence: default_stt_confidence(),
            activity_idle_timeout_secs: default_activity_idle_timeout_secs(),
        }
    }
}

impl fmt::Debug for HeyGenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeyGenConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("avatar_name", &self.avatar_name)
            .field("quality", &self.quality)
            .finish_non_exhaustive()
    }
}

impl HeyGenConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}
