//! Application configuration.

use crate::error::{AppError, AppResult};
use refmon_dashboard::DashboardConfig;
use refmon_ws::{endpoint_url, ChannelConfig, DEFAULT_RECONNECT_DELAY_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file used when neither `--config` nor `REFMON_CONFIG` is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Reflector host, optionally with port.
    #[serde(default = "default_host")]
    pub host: String,
    /// Use `wss://` (true) or `ws://` (false).
    #[serde(default = "default_secure")]
    pub secure: bool,
    /// Full endpoint URL. Overrides `host` and `secure` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub websocket: WsConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_secure() -> bool {
    true
}

/// WebSocket configuration subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsConfig {
    /// Fixed delay before each reconnect attempt (ms).
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

fn default_reconnect_delay_ms() -> u64 {
    DEFAULT_RECONNECT_DELAY_MS
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    refmon_telemetry::logging::DEFAULT_FILTER.to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            secure: default_secure(),
            url: None,
            websocket: WsConfig::default(),
            dashboard: DashboardConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Explicit path (CLI arg or `REFMON_CONFIG`), else the default.
    pub fn resolve_path(explicit: Option<String>) -> String {
        explicit.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Load from `path`, or `None` if the file does not exist.
    pub fn load_from(path: &str) -> AppResult<Option<Self>> {
        if Path::new(path).exists() {
            Self::from_file(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Endpoint the snapshot channel connects to.
    pub fn ws_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => endpoint_url(&self.host, self.secure),
        }
    }

    pub fn channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            url: self.ws_url(),
            reconnect_delay_ms: self.websocket.reconnect_delay_ms,
        }
    }

    /// Reject configurations that can never run.
    pub fn validate(&self) -> AppResult<()> {
        if self.url.is_none() && self.host.trim().is_empty() {
            return Err(AppError::Config("host must not be empty".to_string()));
        }
        self.channel_config().validate()?;
        self.dashboard.validate()?;
        Ok(())
    }
}
