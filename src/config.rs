use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::export::ExportFormat;
use crate::logging::LogConfig;
use crate::normalize::RunnerInput;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Saved runner profile; command-line flags override individual fields
    pub runner: Option<RunnerInput>,

    /// Logging settings
    pub logging: LogConfig,

    /// Output preferences
    pub output: OutputSettings,
}

/// Output preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Default output format (table, json, csv)
    pub format: ExportFormat,

    /// Colorize table output
    pub color: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Table,
            color: true,
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".paceplan")
            .join("config.toml")
    }

    /// Load `path` (or the default path), falling back to defaults when it is missing
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if !config_path.exists() {
            if path.is_some() {
                warn!("Config file not found, using defaults: {}", config_path.display());
            }
            return Ok(Self::default());
        }
        Self::load_from_file(&config_path)
    }

    /// Example configuration written by `config --init`
    pub fn sample() -> Self {
        Self {
            runner: Some(RunnerInput {
                race_date: "2025-03-31".to_string(),
                recent_weekly_km: 60.0,
                recent_long_km: 24.0,
                goal_marathon_time: "03:30:00".to_string(),
                current_mp: "05:10".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}
