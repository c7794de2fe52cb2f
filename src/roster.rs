//! Batch planning for a roster of runners using rayon
//!
//! A roster is a CSV file with one runner per row. Each row is normalized and
//! planned independently, so rows run in parallel and a bad row only fails
//! itself.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, PlannerError, Result};
use crate::models::MultiWeekPlan;
use crate::multi_week::generate_multi_week_plan;
use crate::normalize::{parse_date, RunnerInput};

/// One roster row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRow {
    pub name: String,
    pub race_date: String,
    pub recent_weekly_km: f64,
    pub recent_long_km: f64,
    pub goal_marathon_time: String,
    pub current_mp: String,
    #[serde(default)]
    pub injury_flag: Option<bool>,
    #[serde(default)]
    pub weekly_elevation_gain_m: Option<f64>,
    #[serde(default)]
    pub fatigue_score: Option<u8>,
    #[serde(default)]
    pub weekly_frequency: Option<u8>,
    /// Cycle start, YYYY-MM-DD; the batch default when empty
    #[serde(default)]
    pub start_date: Option<String>,
}

impl RosterRow {
    pub fn to_input(&self) -> RunnerInput {
        RunnerInput {
            race_date: self.race_date.clone(),
            recent_weekly_km: self.recent_weekly_km,
            recent_long_km: self.recent_long_km,
            goal_marathon_time: self.goal_marathon_time.clone(),
            current_mp: self.current_mp.clone(),
            injury_flag: self.injury_flag.unwrap_or(false),
            weekly_elevation_gain_m: self.weekly_elevation_gain_m,
            fatigue_score: self.fatigue_score,
            weekly_frequency: self.weekly_frequency,
        }
    }

    fn plan(&self, default_start: Option<NaiveDate>) -> std::result::Result<MultiWeekPlan, ConfigError> {
        let config = self.to_input().normalize()?;
        let start_date = match self.start_date.as_deref().map(str::trim) {
            Some(date) if !date.is_empty() => Some(parse_date("start_date", date)?),
            _ => default_start,
        };
        generate_multi_week_plan(&config, start_date)
    }
}

/// Read roster rows from any CSV source
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<RosterRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

pub fn load_roster(path: &Path) -> Result<Vec<RosterRow>> {
    debug!("Reading roster from {}", path.display());
    let file = std::fs::File::open(path)?;
    let rows = read_roster(file)?;
    info!("Loaded {} runners from {}", rows.len(), path.display());
    Ok(rows)
}

/// Configuration for batch planning
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Worker threads; rayon's default when `None`
    pub num_threads: Option<usize>,
    /// Start date for rows without one; today when `None`
    pub default_start: Option<NaiveDate>,
}

/// Outcome for a single runner
#[derive(Debug, Clone)]
pub struct RunnerResult {
    pub name: String,
    pub plan: Option<MultiWeekPlan>,
    pub error: Option<ConfigError>,
    pub duration_ms: u128,
}

impl RunnerResult {
    pub fn is_success(&self) -> bool {
        self.plan.is_some()
    }
}

/// Summary of a batch run, results in roster order
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub results: Vec<RunnerResult>,
    pub total_duration_ms: u128,
}

impl BatchSummary {
    pub fn successful(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.successful()
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &ConfigError)> {
        self.results
            .iter()
            .filter_map(|r| r.error.as_ref().map(|e| (r.name.as_str(), e)))
    }

    pub fn to_string_pretty(&self) -> String {
        format!(
            "Batch Planning Summary\n  \
             Runners: {}\n  \
             Planned: {}\n  \
             Failed: {}\n  \
             Total Time: {:.2}s",
            self.results.len(),
            self.successful(),
            self.failed(),
            self.total_duration_ms as f64 / 1000.0
        )
    }
}

/// Plan every runner in parallel
pub fn plan_roster(rows: &[RosterRow], config: &BatchConfig) -> Result<BatchSummary> {
    let start_time = Instant::now();

    let run = || -> Vec<RunnerResult> {
        rows.par_iter()
            .map(|row| {
                let row_start = Instant::now();
                let outcome = row.plan(config.default_start);
                let duration_ms = row_start.elapsed().as_millis();
                match outcome {
                    Ok(plan) => {
                        debug!("Planned {} ({} weeks)", row.name, plan.weeks.len());
                        RunnerResult {
                            name: row.name.clone(),
                            plan: Some(plan),
                            error: None,
                            duration_ms,
                        }
                    }
                    Err(e) => {
                        warn!("Failed to plan {}: {}", row.name, e);
                        RunnerResult {
                            name: row.name.clone(),
                            plan: None,
                            error: Some(e),
                            duration_ms,
                        }
                    }
                }
            })
            .collect()
    };

    let results = match config.num_threads {
        Some(num_threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| {
                PlannerError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
            })?
            .install(run),
        None => run(),
    };

    let summary = BatchSummary {
        results,
        total_duration_ms: start_time.elapsed().as_millis(),
    };
    info!("{}", summary.to_string_pretty());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = "\
name,race_date,recent_weekly_km,recent_long_km,goal_marathon_time,current_mp,injury_flag,weekly_elevation_gain_m,fatigue_score,weekly_frequency,start_date
Ana,2025-03-31,60,24,03:30:00,05:10,,,,,
Ben,2025-03-31,40,18,04:00:00,5:45,true,900,8,4,2025-02-03
Cho,2025-01-01,40,18,04:00:00,5:45,,,,,
";

    fn batch_config() -> BatchConfig {
        BatchConfig {
            num_threads: Some(2),
            default_start: NaiveDate::from_ymd_opt(2025, 1, 6),
        }
    }

    #[test]
    fn test_read_roster() {
        let rows = read_roster(ROSTER.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].injury_flag, None);
        assert_eq!(rows[0].start_date, None);
        assert_eq!(rows[1].injury_flag, Some(true));
        assert_eq!(rows[1].weekly_frequency, Some(4));
        assert!(rows[1].to_input().injury_flag);
    }

    #[test]
    fn test_plan_roster_collects_per_runner_errors() {
        let rows = read_roster(ROSTER.as_bytes()).unwrap();
        let summary = plan_roster(&rows, &batch_config()).unwrap();
        assert_eq!(summary.results.len(), 3);
        assert_eq!(summary.successful(), 2);
        assert_eq!(summary.failed(), 1);

        let names: Vec<_> = summary.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Ben", "Cho"]);

        let ana = summary.results[0].plan.as_ref().unwrap();
        assert_eq!(ana.weeks.len(), 13);
        let ben = summary.results[1].plan.as_ref().unwrap();
        assert_eq!(ben.start_date, NaiveDate::from_ymd_opt(2025, 2, 3).unwrap());

        let (name, error) = summary.errors().next().unwrap();
        assert_eq!(name, "Cho");
        assert!(matches!(error, ConfigError::RaceNotAfterStart { .. }));
    }

    #[test]
    fn test_batch_matches_sequential_planning() {
        let rows = read_roster(ROSTER.as_bytes()).unwrap();
        let parallel = plan_roster(&rows, &BatchConfig {
            num_threads: None,
            ..batch_config()
        })
        .unwrap();
        let expected = rows[0].plan(batch_config().default_start).unwrap();
        assert_eq!(parallel.results[0].plan.as_ref(), Some(&expected));
    }
}
