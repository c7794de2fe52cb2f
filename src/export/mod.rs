//! Plan output in table, JSON and CSV form

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{ExportError, Result};
use crate::models::{MultiWeekPlan, WeekPlan};

pub mod csv;
pub mod json;
pub mod text;

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Terminal tables
    Table,
    Json,
    /// One row per day
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" | "txt" => Ok(ExportFormat::Table),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl ExportFormat {
    /// Guess the format from an output file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

pub fn render_week(week: &WeekPlan, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Table => Ok(text::render_week(week)),
        ExportFormat::Json => json::to_json(week),
        ExportFormat::Csv => csv::to_csv(std::slice::from_ref(week)),
    }
}

pub fn render_cycle(plan: &MultiWeekPlan, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Table => Ok(text::render_cycle(plan)),
        ExportFormat::Json => json::to_json(plan),
        ExportFormat::Csv => csv::to_csv(&plan.weeks),
    }
}

/// Write rendered output to `path`, or stdout when `None`
pub fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| ExportError::ExportFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            }
            fs::write(path, content).map_err(|e| ExportError::ExportFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            info!("Wrote {} bytes to {}", content.len(), path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Table);
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(ExportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ExportFormat::from_path(&PathBuf::from("plan.csv")),
            Some(ExportFormat::Csv)
        );
        assert_eq!(ExportFormat::from_path(&PathBuf::from("plan.pdf")), None);
        assert_eq!(ExportFormat::from_path(&PathBuf::from("plan")), None);
    }

    #[test]
    fn test_write_output_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("plan.json");
        write_output("{}", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }
}
