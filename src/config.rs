//! Runtime configuration.
//!
//! Defaults, then an optional JSON file, then `TASKERS_*` environment
//! variables. The API key itself is not resolved here: it is looked up each
//! time a quote is requested.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_CONFIG_FILE: &str = "taskers-focus.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub model: String,
    pub prompt: String,
    /// Environment variable holding the bearer credential.
    pub api_key_env: String,
    /// Explicit key; wins over `api_key_env` when set.
    pub api_key: Option<String>,
    pub log_file: PathBuf,
    pub log_level: String,
    pub tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "https://api.deepseek.com/v1/chat/completions".to_string(),
            model: "deepseek-chat".to_string(),
            prompt: "Generate a short motivational quote about productivity".to_string(),
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
            api_key: None,
            log_file: PathBuf::from("taskers-focus.log"),
            log_level: "info".to_string(),
            tick_ms: 100,
        }
    }
}

impl Config {
    /// Reads `TASKERS_CONFIG` (or `taskers-focus.json`) and applies env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("TASKERS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::from_path(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Missing file means defaults; a malformed one is an error.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(?path, "config file not found, using defaults");
            return Ok(Self::default());
        }
        debug!(?path, "loading config file");
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = non_empty("TASKERS_API_URL") {
            self.api_url = v;
        }
        if let Some(v) = non_empty("TASKERS_MODEL") {
            self.model = v;
        }
        if let Some(v) = non_empty("TASKERS_LOG_LEVEL") {
            self.log_level = v;
        }
        if let Some(v) = non_empty("TASKERS_LOG_FILE") {
            self.log_file = PathBuf::from(v);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue("api_url is empty".to_string()));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "tick_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Bearer credential as of right now. Empty when nothing is configured.
    pub fn api_key(&self) -> String {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .unwrap_or_default()
    }
}
