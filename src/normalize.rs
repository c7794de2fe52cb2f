//! Raw runner input parsing
//!
//! Turns the scalar strings a runner types (dates, finish times, paces) into
//! a validated [`PlanConfig`].

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::{ActualMileage, Pace, PlanConfig};
use crate::rules::DISTANCE_DP;

/// Unvalidated runner parameters, as read from flags, a config file or a roster row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerInput {
    /// Race date, YYYY-MM-DD
    pub race_date: String,
    pub recent_weekly_km: f64,
    pub recent_long_km: f64,
    /// Goal finish time, HH:MM or HH:MM:SS
    pub goal_marathon_time: String,
    /// Current marathon pace, M:SS per km
    pub current_mp: String,
    #[serde(default)]
    pub injury_flag: bool,
    #[serde(default)]
    pub weekly_elevation_gain_m: Option<f64>,
    #[serde(default)]
    pub fatigue_score: Option<u8>,
    #[serde(default)]
    pub weekly_frequency: Option<u8>,
}

impl RunnerInput {
    pub fn normalize(&self) -> Result<PlanConfig, ConfigError> {
        let weekly_elevation_gain_m = match self.weekly_elevation_gain_m {
            Some(gain) => Some(to_decimal("weekly_elevation_gain_m", gain)?),
            None => None,
        };

        let config = PlanConfig {
            race_date: parse_date("race_date", &self.race_date)?,
            recent_weekly_km: parse_distance("recent_weekly_km", self.recent_weekly_km)?,
            recent_long_km: parse_distance("recent_long_km", self.recent_long_km)?,
            goal_marathon_time_secs: parse_finish_time("goal_marathon_time", &self.goal_marathon_time)?,
            current_marathon_pace: parse_pace("current_mp", &self.current_mp)?,
            injury_flag: self.injury_flag,
            weekly_elevation_gain_m,
            fatigue_score: self.fatigue_score,
            weekly_frequency: self.weekly_frequency,
        };
        config.validate()?;
        Ok(config)
    }
}

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ConfigError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Parse a finish time given as `HH:MM` or `HH:MM:SS` into seconds
pub fn parse_finish_time(field: &str, value: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidTime {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let parts = split_numbers(value).ok_or_else(|| invalid("expected HH:MM or HH:MM:SS"))?;
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m] => (*h, *m, 0),
        [h, m, s] => (*h, *m, *s),
        _ => return Err(invalid("expected HH:MM or HH:MM:SS")),
    };
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid("minutes and seconds must be below 60"));
    }
    if hours >= 24 {
        return Err(invalid("must be under 24 hours"));
    }

    let total = hours * 3600 + minutes * 60 + seconds;
    if total == 0 {
        return Err(invalid("must be positive"));
    }
    Ok(total)
}

/// Parse a pace given as `M:SS` (optionally suffixed with `/km`)
pub fn parse_pace(field: &str, value: &str) -> Result<Pace, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidPace {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = value.trim().trim_end_matches("/km");
    let parts = split_numbers(trimmed).ok_or_else(|| invalid("expected M:SS"))?;
    let (minutes, seconds) = match parts.as_slice() {
        [m, s] => (*m, *s),
        _ => return Err(invalid("expected M:SS")),
    };
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid("minutes and seconds must be below 60"));
    }

    let total = minutes * 60 + seconds;
    if total == 0 {
        return Err(invalid("must be positive"));
    }
    Ok(Pace::from_seconds(total))
}

pub fn parse_distance(field: &str, km: f64) -> Result<Decimal, ConfigError> {
    let value = to_decimal(field, km)?;
    if value <= Decimal::ZERO {
        return Err(ConfigError::NonPositiveDistance {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Parse an actual-mileage override: `INDEX=KM` or `INDEX=KM/LONG_KM`
pub fn parse_override(value: &str) -> Result<(usize, ActualMileage), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidOverride {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let (index, distances) = value
        .split_once('=')
        .ok_or_else(|| invalid("expected INDEX=KM or INDEX=KM/LONG_KM"))?;
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| invalid("week index must be a non-negative integer"))?;

    let (weekly, long) = match distances.split_once('/') {
        Some((weekly, long)) => (weekly, Some(long)),
        None => (distances, None),
    };
    let weekly_km = parse_km("actual_weekly_km", weekly).map_err(|_| invalid("weekly km must be a positive number"))?;
    let long_run_km = match long {
        Some(long) => Some(
            parse_km("actual_long_run_km", long).map_err(|_| invalid("long-run km must be a positive number"))?,
        ),
        None => None,
    };

    Ok((
        index,
        ActualMileage {
            weekly_km,
            long_run_km,
        },
    ))
}

fn parse_km(field: &str, value: &str) -> Result<Decimal, ConfigError> {
    let km: f64 = value.trim().parse().map_err(|_| ConfigError::NonPositiveDistance {
        field: field.to_string(),
        value: Decimal::ZERO,
    })?;
    parse_distance(field, km)
}

fn to_decimal(field: &str, value: f64) -> Result<Decimal, ConfigError> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(DISTANCE_DP))
        .ok_or_else(|| ConfigError::NonPositiveDistance {
            field: field.to_string(),
            value: Decimal::ZERO,
        })
}

fn split_numbers(value: &str) -> Option<Vec<u32>> {
    let parts: Vec<&str> = value.trim().split(':').collect();
    if parts.iter().any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }
    parts.iter().map(|p| p.parse().ok()).collect()
}
