//! Single-week planning pipeline
//!
//! Runs phase, goal tier, volume, long run, quality, pace bands and day
//! assembly in order for one calendar week.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::goal_tier::{goal_pace, resolve};
use crate::long_run::{plan_long_run, LongRunPlan};
use crate::models::{PlanConfig, TrainingHistory, WeekPlan};
use crate::notes::{self, Advisory, WeekSummary};
use crate::pace::PaceBands;
use crate::phase::{classify, is_race_week, weeks_remaining, weeks_to_race};
use crate::quality;
use crate::rules::{default_frequency, MIN_STAGE, RACE_WEEK_FLOOR_KM};
use crate::schedule::{assemble_days, layout_week, LongRunSlot};
use crate::volume::{reconcile, weekly_target, Reconciled};

/// Carried-forward inputs for one week of a cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekContext {
    pub index: usize,
    pub start_date: NaiveDate,
    /// Last week's actual (or assumed) weekly distance
    pub baseline_weekly_km: Decimal,
    /// Last week's actual (or assumed) long run
    pub baseline_long_km: Decimal,
}

impl WeekContext {
    /// First week of a plan, seeded from the runner's recent training
    pub fn first(config: &PlanConfig, start_date: NaiveDate) -> Self {
        Self {
            index: 0,
            start_date,
            baseline_weekly_km: config.recent_weekly_km,
            baseline_long_km: config.recent_long_km,
        }
    }

    pub fn next(&self, weekly_km: Decimal, long_km: Decimal) -> Self {
        Self {
            index: self.index + 1,
            start_date: self.start_date + Duration::days(7),
            baseline_weekly_km: weekly_km,
            baseline_long_km: long_km,
        }
    }
}

/// Today's local date, used when no start date is given
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Plan the week starting at `start_date` (today when `None`).
pub fn generate_week_plan(
    config: &PlanConfig,
    start_date: Option<NaiveDate>,
) -> Result<WeekPlan, ConfigError> {
    config.validate()?;
    let start_date = start_date.unwrap_or_else(today);
    // A lone week still needs a day before the race
    weeks_remaining(start_date, config.race_date)?;
    let week = plan_week(config, &WeekContext::first(config, start_date), &TrainingHistory::new())?;
    info!(
        "Planned week of {}: {} {} {} km",
        week.start_date, week.phase, week.goal_tier, week.planned_weekly_km
    );
    Ok(week)
}

/// Run the pipeline for one week with the history resolved so far
pub fn plan_week(
    config: &PlanConfig,
    ctx: &WeekContext,
    history: &TrainingHistory,
) -> Result<WeekPlan, ConfigError> {
    let weeks_to_race = weeks_to_race(ctx.start_date, config.race_date)?;
    let phase = classify(weeks_to_race);
    let race_week = is_race_week(weeks_to_race);

    let goal = goal_pace(config.goal_marathon_time_secs);
    let tier = resolve(goal, config.current_marathon_pace);
    let bands = PaceBands::calculate(goal, config.current_marathon_pace);
    debug!(
        "Week {}: {} weeks to race, {} / {}, goal pace {}",
        ctx.index, weeks_to_race, phase, tier, goal
    );

    let volume = weekly_target(
        ctx.baseline_weekly_km,
        phase,
        tier,
        weeks_to_race,
        config.injury_flag,
    );
    let sessions = quality::allocate(phase, tier, weeks_to_race);

    let frequency = config
        .weekly_frequency
        .unwrap_or_else(|| default_frequency(ctx.baseline_weekly_km));
    let layout = layout_week(
        ctx.start_date,
        config.race_date,
        frequency,
        sessions.len(),
        race_week,
    );
    let placed = &sessions[..layout.quality_placed];
    let quality_km = quality::total_distance(placed);

    let mut long_run = if layout.has_long_run() {
        plan_long_run(
            phase,
            tier,
            weeks_to_race,
            ctx.baseline_long_km,
            volume.target_km,
            history,
        )
    } else {
        LongRunPlan {
            distance_km: Decimal::ZERO,
            stage: MIN_STAGE,
            advisories: Vec::new(),
        }
    };

    let reconciled = if layout.running_days() == 0 {
        Reconciled {
            planned_km: Decimal::ZERO,
            advisories: vec![Advisory::RaceDayWeek],
        }
    } else if race_week && !layout.has_long_run() && layout.running_days() == 1 {
        let planned_km = reconcile(RACE_WEEK_FLOOR_KM, Decimal::ZERO, quality_km, 1).planned_km;
        Reconciled {
            planned_km,
            advisories: vec![Advisory::SingleRunBeforeRace {
                distance_km: planned_km,
            }],
        }
    } else {
        reconcile(
            volume.target_km,
            long_run.distance_km,
            quality_km,
            layout.easy_days(),
        )
    };

    // Without easy days the long run takes up any floor top-up
    if layout.easy_days() == 0 && layout.has_long_run() {
        long_run.distance_km = reconciled.planned_km - quality_km;
    }

    let days = assemble_days(
        &layout,
        reconciled.planned_km,
        LongRunSlot {
            distance_km: long_run.distance_km,
            stage: long_run.stage,
        },
        placed,
        &bands,
        phase,
        tier,
        race_week,
    );

    let mut advisories: Vec<Advisory> = Vec::new();
    if layout.running_days() > 0 {
        advisories.extend(volume.advisories);
    }
    advisories.extend(long_run.advisories);
    advisories.extend(layout.advisories);
    advisories.extend(reconciled.advisories);
    for adjustment in advisories.iter().filter(|a| a.is_adjustment()) {
        warn!("Week {}: {}", ctx.index, adjustment);
    }
    advisories.extend(notes::summary_notes(&WeekSummary {
        phase,
        previous_weekly_km: ctx.baseline_weekly_km,
        planned_weekly_km: reconciled.planned_km,
        quality_sessions: layout.quality_placed,
        long_run_stage: long_run.stage,
        long_run_km: long_run.distance_km,
        fatigue_score: config.fatigue_score,
        weekly_elevation_gain_m: config.weekly_elevation_gain_m,
    }));

    Ok(WeekPlan {
        index: ctx.index,
        start_date: ctx.start_date,
        end_date: ctx.start_date + Duration::days(6),
        phase,
        goal_tier: tier,
        weeks_to_race,
        baseline_weekly_km: ctx.baseline_weekly_km,
        target_weekly_km: volume.target_km,
        planned_weekly_km: reconciled.planned_km,
        quality_sessions: layout.quality_placed,
        long_run_km: long_run.distance_km,
        long_run_stage: long_run.stage,
        days,
        notes: notes::render(&advisories),
        actual: None,
    })
}
