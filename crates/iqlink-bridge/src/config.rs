//! Application configuration.
//!
//! Host, ports, and credentials come from a TOML file; the config
//! source stands in for the feed installation's own settings store.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Feed daemon endpoints and bring-up pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Feed daemon host. The daemon normally runs alongside the bridge.
    #[serde(default = "default_host")]
    pub host: String,
    /// Administrative/registration channel port.
    #[serde(default = "default_admin_port")]
    pub admin_port: u16,
    /// Live quote (level one) channel port.
    #[serde(default = "default_quote_port")]
    pub quote_port: u16,
    /// Historical lookup channel port.
    #[serde(default = "default_lookup_port")]
    pub lookup_port: u16,
    /// Settling delay between bring-up stages (ms), giving the daemon
    /// room for its own asynchronous startup.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_admin_port() -> u16 {
    9300
}

fn default_quote_port() -> u16 {
    5009
}

fn default_lookup_port() -> u16 {
    9100
}

fn default_settle_ms() -> u64 {
    2_000
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            admin_port: default_admin_port(),
            quote_port: default_quote_port(),
            lookup_port: default_lookup_port(),
            settle_ms: default_settle_ms(),
        }
    }
}

/// Identity presented during the admin handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub login_id: String,
    #[serde(default)]
    pub password: String,
    /// Application name registered with the daemon.
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_app_version")]
    pub app_version: String,
}

fn default_app_name() -> String {
    "IQLINK".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            login_id: String::new(),
            password: String::new(),
            app_name: default_app_name(),
            app_version: default_app_version(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    /// Symbols watched as soon as the quote channel is up.
    #[serde(default)]
    pub symbols: Vec<String>,
}

impl AppConfig {
    /// Load configuration, resolving the path as CLI argument,
    /// `IQLINK_CONFIG`, then the default location.
    pub fn load(path_override: Option<String>) -> AppResult<Self> {
        let config_path = path_override
            .or_else(|| std::env::var("IQLINK_CONFIG").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content).map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}
