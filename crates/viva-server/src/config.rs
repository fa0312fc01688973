//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;
use viva_providers::{GladiaConfig, HeyGenConfig, WorkflowConfig};

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Workflow engine endpoints.
    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// Live transcription provider.
    #[serde(default)]
    pub gladia: GladiaConfig,

    /// Avatar streaming provider.
    #[serde(default)]
    pub heygen: HeyGenConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served under `/static`; its `index.html` is served at `/`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "viva_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults, then applies
/// environment overrides.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies environment overrides through `lookup` so tests need not touch the
/// process environment.
///
/// - `VIVA_HOST`, `VIVA_PORT`, `VIVA_STATIC_DIR` override `server.*`
/// - `VIVA_LOG_LEVEL`, `VIVA_LOG_JSON` ("true"/"1") override `logging.*`
/// - `WORKFLOW_START_URL`, `WORKFLOW_START_TIMEOUT_SECS`,
///   `WORKFLOW_FORWARD_TIMEOUT_SECS` override `workflow.*`
/// - `GLADIA_SERVER_URL`, `GLADIA_API_KEY` override `gladia.*`
/// - `HEYGEN_SERVER_URL`, `HEYGEN_API_KEY`, `AVATAR_NAME` override `heygen.*`
///
/// Unparseable numeric values are ignored.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(host) = lookup("VIVA_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = lookup("VIVA_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(dir) = lookup("VIVA_STATIC_DIR") {
        config.server.static_dir = dir;
    }
    if let Some(level) = lookup("VIVA_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("VIVA_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    if let Some(url) = lookup("WORKFLOW_START_URL") {
        config.workflow.start_url = url;
    }
    if let Some(secs) = lookup("WORKFLOW_START_TIMEOUT_SECS") {
        if let Ok(parsed) = secs.parse() {
            config.workflow.start_timeout_secs = parsed;
        }
    }
    if let Some(secs) = lookup("WORKFLOW_FORWARD_TIMEOUT_SECS") {
        if let Ok(parsed) = secs.parse() {
            config.workflow.forward_timeout_secs = parsed;
        }
    }

    if let Some(url) = lookup("GLADIA_SERVER_URL") {
        config.gladia.base_url = url;
    }
    if let Some(key) = lookup("GLADIA_API_KEY") {
        config.gladia.api_key = key;
    }

    if let Some(url) = lookup("HEYGEN_SERVER_URL") {
        config.heygen.base_url = url;
    }
    if let Some(key) = lookup("HEYGEN_API_KEY") {
        config.heygen.api_key = key;
    }
    if let Some(name) = lookup("AVATAR_NAME") {
        config.heygen.avatar_name = name;
    }
}
