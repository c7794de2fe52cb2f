//! Unified error hierarchy for paceplan
//!
//! The planning engine only ever fails with a [`ConfigError`]; the wider
//! crate (config files, exports, rosters) wraps it in [`PlannerError`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all paceplan operations
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Invalid or inconsistent planning input
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Config file could not be written
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV read/write errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Planning input errors. Always surfaced, never silently corrected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Date string is not a calendar date
    #[error("Invalid date for {field}: '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { field: String, value: String },

    /// Race date must come after the plan start date
    #[error("Race date {race_date} must be after start date {start_date}")]
    RaceNotAfterStart {
        start_date: NaiveDate,
        race_date: NaiveDate,
    },

    /// Distances must be strictly positive
    #[error("Distance for {field} must be positive, got {value} km")]
    NonPositiveDistance { field: String, value: Decimal },

    /// Finish time string could not be parsed
    #[error("Invalid time for {field}: '{value}' ({reason})")]
    InvalidTime {
        field: String,
        value: String,
        reason: String,
    },

    /// Pace string could not be parsed
    #[error("Invalid pace for {field}: '{value}' ({reason})")]
    InvalidPace {
        field: String,
        value: String,
        reason: String,
    },

    /// Fatigue score outside 0-10
    #[error("Fatigue score must be between 0 and 10, got {0}")]
    FatigueOutOfRange(u8),

    /// Weekly running frequency outside 1-7
    #[error("Weekly frequency must be between 1 and 7 days, got {0}")]
    InvalidFrequency(u8),

    /// Elevation gain cannot be negative
    #[error("Weekly elevation gain cannot be negative, got {0} m")]
    NegativeElevation(Decimal),

    /// Override string is not `INDEX=KM` or `INDEX=KM/LONG_KM`
    #[error("Invalid override '{value}': {reason}")]
    InvalidOverride { value: String, reason: String },

    /// Actual-mileage override for a week outside the cycle
    #[error("Override for week {index} is outside the cycle ({weeks} weeks)")]
    OverrideOutOfRange { index: usize, weeks: usize },
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Export failed to {path}: {reason}")]
    ExportFailed { path: PathBuf, reason: String },
}

/// Result type alias for paceplan operations
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PlannerError::Config(_) => ErrorSeverity::Warning,
            PlannerError::Export(ExportError::UnsupportedFormat(_)) => ErrorSeverity::Warning,
            PlannerError::Io(_) | PlannerError::Export(_) => ErrorSeverity::Error,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Config(ConfigError::RaceNotAfterStart { race_date, .. }) => {
                format!(
                    "The race on {} has already started or passed. Pick a start date before race day.",
                    race_date
                )
            }
            PlannerError::Config(ConfigError::OverrideOutOfRange { index, weeks }) => {
                format!(
                    "Week {} does not exist; this cycle has weeks 0 to {}.",
                    index,
                    weeks.saturating_sub(1)
                )
            }
            PlannerError::TomlParse(_) => {
                "Unable to read the config file. Please check its TOML syntax.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the operation
    Error,
    /// Bad input the user can correct
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
