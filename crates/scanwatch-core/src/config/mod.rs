//! Client configuration.
//!
//! `ClientConfig` is persisted as JSON by the CLI. Every field has a default,
//! so a missing or partial file still yields a usable configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::normalize_base_url;
use crate::error::{Error, Result};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_CONFIRM_COOLDOWN_MS: u64 = 1000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Environment variable overriding the configured server URL.
pub const SERVER_URL_ENV: &str = "SCANWATCH_SERVER_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_confirm_cooldown_ms")]
    pub confirm_cooldown_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            confirm_cooldown_ms: DEFAULT_CONFIRM_COOLDOWN_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

const fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

const fn default_confirm_cooldown_ms() -> u64 {
    DEFAULT_CONFIRM_COOLDOWN_MS
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ClientConfig {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str::<Self>(&raw)?;
        config.validated()
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let normalized = self.clone().validated()?;
        let serialized = serde_json::to_string_pretty(&normalized)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Apply overrides in precedence order: explicit value, then environment.
    pub fn with_server_override(
        mut self,
        explicit: Option<String>,
        env_value: Option<String>,
    ) -> Result<Self> {
        let url = [explicit, env_value]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty());
        if let Some(url) = url {
            self.server_url = normalize_base_url(url)?;
        }
        Ok(self)
    }

    /// Normalize the URL and reject zero intervals.
    pub fn validated(mut self) -> Result<Self> {
        self.server_url = normalize_base_url(self.server_url)?;
        if self.poll_interval_ms == 0 {
            return Err(Error::InvalidInput(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::InvalidInput(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub const fn confirm_cooldown(&self) -> Duration {
        Duration::from_millis(self.confirm_cooldown_ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
