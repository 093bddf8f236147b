//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::parse_duration;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Community API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL farm ids are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Largest response body accepted, in bytes
    #[serde(default = "default_max_content_size")]
    pub max_content_size: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://api.sunflower-land.com/community/farms/".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_content_size() -> usize {
    10 * 1024 * 1024
}

fn default_user_agent() -> String {
    format!("farm-timers/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            max_content_size: default_max_content_size(),
            user_agent: default_user_agent(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Per-caller command cooldown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownConfig {
    /// Window between commands from one caller (e.g. "30s", "2m")
    #[serde(default = "default_cooldown_window")]
    pub window: String,
}

fn default_cooldown_window() -> String {
    "30s".to_string()
}

/// Longest accepted cooldown window.
pub const MAX_COOLDOWN_WINDOW: Duration = Duration::from_secs(24 * 3600);

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            window: default_cooldown_window(),
        }
    }
}

impl CooldownConfig {
    pub fn window(&self) -> Option<Duration> {
        parse_duration(&self.window)
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub cooldown: CooldownConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api: ApiConfig::default(),
            server: ServerConfig::default(),
            cooldown: CooldownConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        if url::Url::parse(&self.api.base_url).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "API base URL is not a valid URL: {}",
                self.api.base_url
            )));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.server.cors_origin != "*" && url::Url::parse(&self.server.cors_origin).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "CORS origin must be \"*\" or a URL: {}",
                self.server.cors_origin
            )));
        }

        match self.cooldown.window() {
            None => {
                return Err(ConfigError::ValidationError(format!(
                    "Cooldown window is not a duration: {}",
                    self.cooldown.window
                )))
            }
            Some(window) if window > MAX_COOLDOWN_WINDOW => {
                return Err(ConfigError::ValidationError(format!(
                    "Cooldown window {} exceeds 24h",
                    self.cooldown.window
                )))
            }
            Some(_) => {}
        }

        Ok(())
    }
}
