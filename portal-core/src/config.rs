//! Client configuration
//!
//! Loaded from an optional TOML file, then overridden by environment
//! variables:
//!
//! - `PORTAL_API_BASE_URL`
//! - `PORTAL_REQUEST_TIMEOUT_SECS`
//! - `PORTAL_POLL_INTERVAL_SECS`
//!
//! A missing file yields the defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use portal_api::{ApiClientConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};

use crate::auth::FileAuthStorage;
use crate::error::{CoreError, CoreResult};

pub const ENV_API_BASE_URL: &str = "PORTAL_API_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "PORTAL_REQUEST_TIMEOUT_SECS";
pub const ENV_POLL_INTERVAL_SECS: &str = "PORTAL_POLL_INTERVAL_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub login_delay_ms: u64,
    /// Defaults to `<data dir>/selfcare-portal/auth.json`.
    pub auth_state_path: Option<PathBuf>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            poll_interval_secs: 30,
            login_delay_ms: 500,
            auth_state_path: None,
        }
    }
}

impl PortalConfig {
    /// Load from `path` (if given and present) and the process environment.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`PortalConfig::load`] with an explicit environment lookup.
    pub fn load_with(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> CoreResult<Self> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                log::debug!("Config file {} not found, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("Cannot read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| CoreError::Config(format!("Invalid {}: {e}", path.display())))
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> CoreResult<()> {
        if let Some(url) = env(ENV_API_BASE_URL) {
            self.api_base_url = url;
        }
        if let Some(secs) = env(ENV_REQUEST_TIMEOUT_SECS) {
            self.request_timeout_secs = parse_secs(ENV_REQUEST_TIMEOUT_SECS, &secs)?;
        }
        if let Some(secs) = env(ENV_POLL_INTERVAL_SECS) {
            self.poll_interval_secs = parse_secs(ENV_POLL_INTERVAL_SECS, &secs)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> CoreResult<()> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CoreError::Config(format!(
                "api_base_url must be an http(s) URL, got '{url}'"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(CoreError::Config(
                "poll_interval_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    pub fn api_client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.api_base_url.trim().to_string(),
            timeout: self.request_timeout(),
        }
    }

    pub fn auth_state_path(&self) -> CoreResult<PathBuf> {
        match &self.auth_state_path {
            Some(path) => Ok(path.clone()),
            None => FileAuthStorage::default_path(),
        }
    }
}

fn parse_secs(key: &str, value: &str) -> CoreResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| CoreError::Config(format!("{key}: invalid number '{value}': {e}")))
}
