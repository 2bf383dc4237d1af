//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::format::NumberFormat;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unset means the transport default (no request timeout)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

/// Where the token, last view and ticket cache are kept
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

fn default_state_file() -> PathBuf {
    crate::session::default_state_file()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
        }
    }
}

/// Revenue chart output
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_chart_width")]
    pub width: f64,

    /// SVG file written by `dashboard`; unset skips the chart
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_chart_width() -> f64 {
    640.0
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            output: None,
        }
    }
}

/// Number formatting
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: char,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,
}

fn default_thousands_separator() -> char {
    ','
}

fn default_decimal_separator() -> char {
    '.'
}

impl DisplayConfig {
    pub fn number_format(&self) -> NumberFormat {
        NumberFormat::new(self.thousands_separator, self.decimal_separator)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            thousands_separator: default_thousands_separator(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("estate-console").join("config.toml")),
            Some(PathBuf::from("./estate.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("ESTATE_API_URL") {
            self.api.base_url = url;
        }
        if let Some(path) = var("ESTATE_STATE_FILE") {
            self.session.state_file = PathBuf::from(path);
        }
        if let Some(level) = var("ESTATE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("ESTATE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Estate Console Configuration
#
# Environment variables override these settings:
# - ESTATE_API_URL
# - ESTATE_STATE_FILE
# - ESTATE_LOG_LEVEL
# - ESTATE_LOG_FORMAT

[api]
# Property management backend
base_url = "http://localhost:8000"

# Request timeout in seconds (unset: no timeout)
# request_timeout_secs = 30

[session]
# Login token, last view and ticket cache
# state_file = "~/.local/share/estate-console/state.json"

[chart]
# Chart width in pixels (height is fixed at 160)
width = 640

# Write the revenue chart as SVG on every dashboard load
# output = "revenue.svg"

[display]
thousands_separator = ","
decimal_separator = "."

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}
