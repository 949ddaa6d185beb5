use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_CONFIRMATION_POLL_MS, DEFAULT_EVENT_POLL_MS,
    DEFAULT_LOG_FILE, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_STATUS_TTL_MS, ENV_LOG_FILE,
    ENV_RPC_TOKEN, ENV_RPC_URL,
};
use crate::error::ConfigError;
use crate::models::RpcAuth;

/// Runtime configuration, read from `~/.ethwallet/config.yaml` and the environment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wallet JSON-RPC endpoint. No endpoint means no provider.
    pub rpc_url: Option<String>,
    pub auth: RpcAuth,
    pub request_timeout_ms: u64,
    pub confirmation_poll_ms: u64,
    pub event_poll_ms: u64,
    pub status_ttl_ms: u64,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rpc_url: None,
            auth: RpcAuth::None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            confirmation_poll_ms: DEFAULT_CONFIRMATION_POLL_MS,
            event_poll_ms: DEFAULT_EVENT_POLL_MS,
            status_ttl_ms: DEFAULT_STATUS_TTL_MS,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Load the config file at the default location, then apply env overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::default_path())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load a config file. A missing or empty file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        let mut config: Config =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.normalize();
        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_RPC_URL) {
            self.rpc_url = Some(url);
        }
        if let Some(token) = lookup(ENV_RPC_TOKEN).filter(|t| !t.is_empty()) {
            self.auth = RpcAuth::Bearer { token };
        }
        if let Some(log_file) = lookup(ENV_LOG_FILE).filter(|p| !p.is_empty()) {
            self.log_file = PathBuf::from(log_file);
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        if self.rpc_url.as_deref().map(str::trim).is_some_and(str::is_empty) {
            self.rpc_url = None;
        }

        // Periods must be non-zero
        for (value, default, name) in [
            (&mut self.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS, "request_timeout_ms"),
            (&mut self.confirmation_poll_ms, DEFAULT_CONFIRMATION_POLL_MS, "confirmation_poll_ms"),
            (&mut self.event_poll_ms, DEFAULT_EVENT_POLL_MS, "event_poll_ms"),
            (&mut self.status_ttl_ms, DEFAULT_STATUS_TTL_MS, "status_ttl_ms"),
        ] {
            if *value == 0 {
                tracing::warn!(field = name, default, "Zero duration in config, using default");
                *value = default;
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn confirmation_poll(&self) -> Duration {
        Duration::from_millis(self.confirmation_poll_ms)
    }

    pub fn event_poll(&self) -> Duration {
        Duration::from_millis(self.event_poll_ms)
    }

    pub fn status_ttl(&self) -> Duration {
        Duration::from_millis(self.status_ttl_ms)
    }
}
