//! Multi-week orchestration
//!
//! A cycle is a replay of the single-week pipeline: each week's baseline is
//! the previous week's actual distance when the runner reported one, and its
//! planned distance otherwise. Recomputing after an override keeps the weeks
//! before the first affected week and replays forward from there.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::models::{HistoryEntry, HistoryOverrides, MultiWeekPlan, PlanConfig, TrainingHistory, WeekPlan};
use crate::phase::cycle_weeks;
use crate::planner::{plan_week, today, WeekContext};

/// Plan every week from `start_date` (today when `None`) through race day.
pub fn generate_multi_week_plan(
    config: &PlanConfig,
    start_date: Option<NaiveDate>,
) -> Result<MultiWeekPlan, ConfigError> {
    recompute_multi_week_plan(config, &HistoryOverrides::new(), start_date)
}

/// Plan the cycle with actual-mileage overrides applied.
///
/// Overrides for weeks outside the cycle are rejected.
pub fn recompute_multi_week_plan(
    config: &PlanConfig,
    overrides: &HistoryOverrides,
    start_date: Option<NaiveDate>,
) -> Result<MultiWeekPlan, ConfigError> {
    config.validate()?;
    let start_date = start_date.unwrap_or_else(today);
    let weeks = cycle_weeks(start_date, config.race_date)? as usize;
    validate_overrides(overrides, weeks)?;

    let mut replay = Replay::new(config, start_date);
    for _ in 0..weeks {
        replay.step(overrides)?;
    }

    let plan = replay.finish();
    info!(
        "Planned {} weeks from {} to race on {} ({} overrides, {} km total)",
        plan.weeks.len(),
        plan.start_date,
        plan.race_date,
        overrides.len(),
        plan.total_planned_km()
    );
    Ok(plan)
}

impl MultiWeekPlan {
    /// Apply overrides to an existing cycle.
    ///
    /// Weeks up to and including the first week whose override changed are
    /// kept; later weeks are replayed. A different config replays everything.
    pub fn apply_overrides(
        &self,
        config: &PlanConfig,
        overrides: &HistoryOverrides,
    ) -> Result<MultiWeekPlan, ConfigError> {
        if *config != self.config {
            debug!("Config changed, replaying the full cycle");
            return recompute_multi_week_plan(config, overrides, Some(self.start_date));
        }
        config.validate()?;
        validate_overrides(overrides, self.weeks.len())?;

        let changed = self
            .weeks
            .iter()
            .position(|week| week.actual != overrides.get(&week.index).copied());
        let Some(first_changed) = changed else {
            return Ok(self.clone());
        };
        debug!("Replaying from week {}", first_changed + 1);

        let mut replay = Replay::new(config, self.start_date);
        for week in &self.weeks[..=first_changed] {
            replay.keep(week.clone(), overrides);
        }
        for _ in first_changed + 1..self.weeks.len() {
            replay.step(overrides)?;
        }
        Ok(replay.finish())
    }
}

fn validate_overrides(overrides: &HistoryOverrides, weeks: usize) -> Result<(), ConfigError> {
    for (&index, actual) in overrides {
        if index >= weeks {
            return Err(ConfigError::OverrideOutOfRange { index, weeks });
        }
        if actual.weekly_km <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveDistance {
                field: format!("actual_weekly_km[{}]", index),
                value: actual.weekly_km,
            });
        }
        if let Some(long) = actual.long_run_km {
            if long <= Decimal::ZERO {
                return Err(ConfigError::NonPositiveDistance {
                    field: format!("actual_long_run_km[{}]", index),
                    value: long,
                });
            }
        }
    }
    Ok(())
}

/// Forward replay state
struct Replay<'a> {
    config: &'a PlanConfig,
    start_date: NaiveDate,
    ctx: WeekContext,
    history: TrainingHistory,
    weeks: Vec<WeekPlan>,
}

impl<'a> Replay<'a> {
    fn new(config: &'a PlanConfig, start_date: NaiveDate) -> Self {
        Self {
            config,
            start_date,
            ctx: WeekContext::first(config, start_date),
            history: TrainingHistory::new(),
            weeks: Vec::new(),
        }
    }

    fn step(&mut self, overrides: &HistoryOverrides) -> Result<(), ConfigError> {
        let week = plan_week(self.config, &self.ctx, &self.history)?;
        self.keep(week, overrides);
        Ok(())
    }

    /// Record a resolved week and carry its actual (or planned) distance forward
    fn keep(&mut self, mut week: WeekPlan, overrides: &HistoryOverrides) {
        week.actual = overrides.get(&week.index).copied();
        let weekly_km = week
            .actual
            .map(|a| a.weekly_km)
            .unwrap_or(week.planned_weekly_km);
        let long_run_km = week
            .actual
            .and_then(|a| a.long_run_km)
            .unwrap_or(week.long_run_km);

        self.history.record(HistoryEntry {
            weekly_km,
            long_run_km,
            planned_stage: week.long_run_stage,
        });
        self.ctx = self.ctx.next(weekly_km, long_run_km);
        self.weeks.push(week);
    }

    fn finish(self) -> MultiWeekPlan {
        MultiWeekPlan {
            start_date: self.start_date,
            race_date: self.config.race_date,
            config: self.config.clone(),
            weeks: self.weeks,
        }
    }
}
