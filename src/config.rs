//! Client configuration
//!
//! Centralized configuration with validation, defaults, and environment
//! variable support.

use crate::errors::{ConfigError, LotteryResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Configuration for the lottery client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the lottery backend, without a trailing slash
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Where the CLI persists the session token between invocations
    pub session_file: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 30,
            session_file: ".jackpot-session".to_string(),
        }
    }
}

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> LotteryResult<ClientConfig> {
        let mut config = if let Some(ref path) = self.config_path {
            self.load_from_file(path)?
        } else {
            ClientConfig::default()
        };

        self.apply_env_overrides(&mut config)?;
        self.validate(&config)?;

        Ok(config)
    }

    /// Load configuration from TOML file
    fn load_from_file(&self, path: &str) -> LotteryResult<ClientConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read {}: {}", path, e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to parse TOML: {}", e)).into())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, config: &mut ClientConfig) -> LotteryResult<()> {
        if let Ok(url) = env::var("JACKPOT_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(timeout) = env::var("JACKPOT_TIMEOUT_SECS") {
            config.timeout_secs = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: "JACKPOT_TIMEOUT_SECS".to_string(),
                value: timeout,
                reason: "Invalid number of seconds".to_string(),
            })?;
        }
        if let Ok(path) = env::var("JACKPOT_SESSION_FILE") {
            config.session_file = path;
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self, config: &ClientConfig) -> LotteryResult<()> {
        if config.base_url.is_empty() {
            return Err(ConfigError::MissingRequired("base_url".to_string()).into());
        }

        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: config.base_url.clone(),
                reason: "Must be an http or https URL".to_string(),
            }
            .into());
        }

        if config.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs".to_string(),
                value: "0".to_string(),
                reason: "Timeout cannot be zero".to_string(),
            }
            .into());
        }

        if config.session_file.is_empty() {
            return Err(ConfigError::MissingRequired("session_file".to_string()).into());
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, config: &ClientConfig, path: &str) -> LotteryResult<()> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write to {}: {}", path, e)).into())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
