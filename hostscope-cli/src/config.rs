//! Configuration management for hostscope.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! command-line arguments and the `OPENAI_API_KEY` environment variable.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use hostscope_analysis::{AnalysisSettings, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use hostscope_telemetry::DEFAULT_PROC_ROOT;

use crate::cli::Args;

/// Configuration file read when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/hostscope/hostscope.yaml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Analysis endpoint configuration
    pub analysis: AnalysisConfig,
    /// Snapshot collection configuration
    pub telemetry: TelemetryConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Print the snapshot instead of requesting an analysis
    pub collect_only: bool,
    /// Print the whole analysis result as JSON
    pub raw_response: bool,
}

/// Analysis endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Model identifier
    pub model: String,
    /// Chat-completions URL
    pub endpoint: String,
    /// API key (required unless collect-only)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AnalysisConfig {
    /// Settings for the analysis client.
    pub fn settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            api_key: self.api_key.clone().unwrap_or_default(),
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Snapshot collection configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Root of the proc filesystem
    pub proc_root: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            proc_root: DEFAULT_PROC_ROOT.to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("An API key must be provided unless --collect-only is used")]
    MissingApiKey,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Build the effective configuration for a command line.
    ///
    /// An explicit `--config` must exist; the default location is optional.
    pub fn resolve(args: &Args) -> Result<Self> {
        let config = match &args.config {
            Some(path) => Config::load(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH)?,
            None => {
                debug!("No config file found, using CLI arguments and defaults");
                Config::default()
            }
        };

        Ok(config.with_cli_overrides(args))
    }

    /// Apply CLI argument overrides to the configuration.
    pub fn with_cli_overrides(mut self, args: &Args) -> Self {
        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }

        if args.log_json {
            self.logging.format = LogFormat::Json;
        }

        if let Some(ref model) = args.model {
            self.analysis.model = model.clone();
        }

        if let Some(ref endpoint) = args.endpoint {
            self.analysis.endpoint = endpoint.clone();
        }

        if let Some(ref api_key) = args.api_key {
            self.analysis.api_key = Some(api_key.clone());
        }

        if let Some(timeout) = args.timeout {
            self.analysis.timeout_secs = timeout;
        }

        if let Some(ref proc_root) = args.proc_root {
            self.telemetry.proc_root = proc_root.clone();
        }

        if args.collect_only {
            self.collect_only = true;
        }

        if args.raw_response {
            self.raw_response = true;
        }

        self
    }

    /// Check the configuration before any collection or network activity.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if hostscope_common::parse_level(&self.logging.level).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                message: format!("must be one of: {:?}", hostscope_common::LOG_LEVELS),
            });
        }

        if self.collect_only {
            return Ok(());
        }

        if self.analysis.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "analysis.model".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.analysis.endpoint.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "analysis.endpoint".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if !self.analysis.timeout_secs.is_finite() || self.analysis.timeout_secs <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "analysis.timeout_secs".to_string(),
                message: "must be a positive number of seconds".to_string(),
            });
        }

        let has_key = self
            .analysis
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());
        if !has_key {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(())
    }
}
