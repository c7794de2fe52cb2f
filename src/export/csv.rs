use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

use crate::error::{PlannerError, Result};
use crate::models::WeekPlan;

/// One CSV row per planned day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRow {
    pub week: usize,
    pub phase: String,
    pub goal_tier: String,
    pub date: String,
    pub weekday: String,
    pub session_type: String,
    pub distance_km: Decimal,
    pub pace_fast: String,
    pub pace_slow: String,
    pub structure: String,
    pub note: String,
}

pub fn week_rows(week: &WeekPlan) -> Vec<DayRow> {
    week.days
        .iter()
        .map(|day| DayRow {
            week: week.index,
            phase: week.phase.label().to_string(),
            goal_tier: week.goal_tier.label().to_string(),
            date: day.date.format("%Y-%m-%d").to_string(),
            weekday: day.weekday.clone(),
            session_type: day.session_type.label().to_string(),
            distance_km: day.distance_km,
            pace_fast: day
                .pace_range
                .map_or(String::new(), |r| r.fast.to_string()),
            pace_slow: day
                .pace_range
                .map_or(String::new(), |r| r.slow.to_string()),
            structure: day.structure.clone(),
            note: day.note.clone(),
        })
        .collect()
}

/// Write every day of `weeks` as CSV
pub fn write_csv<W: Write>(weeks: &[WeekPlan], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for week in weeks {
        for row in week_rows(week) {
            csv_writer.serialize(row)?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv(weeks: &[WeekPlan]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(weeks, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| {
        PlannerError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}
