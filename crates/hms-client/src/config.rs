// Client configuration sourced from environment variables, with an
// optional YAML override file layered on top.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub(crate) const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin of the REST API, without a trailing slash.
    pub base_url: String,
    /// Transport-level timeout applied to every request.
    pub request_timeout: Duration,
    /// Where the session file lives; `None` keeps the session in memory.
    pub session_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
struct ClientConfigOverride {
    base_url: Option<String>,
    request_timeout_ms: Option<u64>,
    session_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("HMS_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let request_timeout = std::env::var("HMS_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|value| *value > 0)
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS));
        let session_file = std::env::var("HMS_SESSION_FILE").ok().map(PathBuf::from);
        Self {
            base_url,
            request_timeout,
            session_file,
        }
    }

    pub fn from_env_or_yaml(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::from_env();
        let override_path = config_path
            .map(|value| value.to_string())
            .or_else(|| std::env::var("HMS_CLIENT_CONFIG").ok());
        if let Some(path) = override_path.as_deref() {
            let contents =
                fs::read_to_string(path).with_context(|| format!("read client config: {path}"))?;
            let override_cfg: ClientConfigOverride =
                serde_yaml::from_str(&contents).context("parse client config yaml")?;
            override_cfg.apply(&mut config);
        }
        Ok(config)
    }
}

impl ClientConfigOverride {
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(value) = &self.base_url {
            config.base_url = value.trim_end_matches('/').to_string();
        }
        if let Some(value) = self.request_timeout_ms
            && value > 0
        {
            config.request_timeout = Duration::from_millis(value);
        }
        if let Some(value) = &self.session_file {
            config.session_file = Some(value.clone());
        }
    }
}
