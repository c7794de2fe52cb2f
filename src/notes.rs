//! Advisory notes attached to a week plan
//!
//! Pipeline stages report non-default behaviour as [`Advisory`] values; the
//! planner renders them to strings once the week is assembled.

use rust_decimal::Decimal;
use std::fmt;

use crate::models::Phase;
use crate::rules::{
    ELEVATION_ADVISORY_M, FATIGUE_ADVISORY_SCORE, LARGE_JUMP_RATIO, MAX_STAGE, RACE_SIMULATION_KM,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    /// Injury or illness flag limited volume growth
    InjuryGrowthCap { factor: Decimal },
    TaperReduction { multiplier: Decimal },
    RaceWeekFloor { floor_km: Decimal },
    VolumeCeiling { ceiling_km: Decimal },
    /// Target too small for the long run, quality work and minimum easy runs
    RaisedToFeasible { target_km: Decimal, planned_km: Decimal },
    WeeklyFloor { floor_km: Decimal },
    /// Every running day is a long or quality session
    NoEasyDays { target_km: Decimal, planned_km: Decimal },
    QualityReduced { requested: usize, placed: usize },
    LongRunCapped { stage_km: Decimal, capped_km: Decimal },
    LongRunCutback { stage: u8 },
    StageFourHold,
    LargeJump { previous_km: Decimal, planned_km: Decimal },
    PhaseFocus(Phase),
    RecoveryWeek,
    DoubleQuality,
    RaceSimulation { stage: u8 },
    Fatigue(u8),
    Elevation(Decimal),
    StreakExceeded(usize),
    /// Week opens on race day: nothing left to train
    RaceDayWeek,
    SingleRunBeforeRace { distance_km: Decimal },
}

impl Advisory {
    /// True when the note reports a change to the planned numbers
    pub fn is_adjustment(&self) -> bool {
        matches!(
            self,
            Advisory::InjuryGrowthCap { .. }
                | Advisory::RaceWeekFloor { .. }
                | Advisory::VolumeCeiling { .. }
                | Advisory::RaisedToFeasible { .. }
                | Advisory::WeeklyFloor { .. }
                | Advisory::NoEasyDays { .. }
                | Advisory::QualityReduced { .. }
                | Advisory::LongRunCapped { .. }
                | Advisory::LongRunCutback { .. }
                | Advisory::StageFourHold
                | Advisory::SingleRunBeforeRace { .. }
        )
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::InjuryGrowthCap { factor } => write!(
                f,
                "Injury/illness flag set: weekly growth capped at {}x. Keep easy days easy and stop if pain returns.",
                factor
            ),
            Advisory::TaperReduction { multiplier } => write!(
                f,
                "Taper: weekly volume set to {}% of last week.",
                (multiplier * Decimal::ONE_HUNDRED).normalize()
            ),
            Advisory::RaceWeekFloor { floor_km } => {
                write!(f, "Race week volume held at the {} km floor.", floor_km)
            }
            Advisory::VolumeCeiling { ceiling_km } => write!(
                f,
                "Weekly volume held at the {} km ceiling for this goal tier.",
                ceiling_km
            ),
            Advisory::RaisedToFeasible {
                target_km,
                planned_km,
            } => write!(
                f,
                "Target {} km cannot fit the long run, quality work and minimum easy runs; planned {} km instead.",
                target_km, planned_km
            ),
            Advisory::WeeklyFloor { floor_km } => {
                write!(f, "Weekly volume raised to the {} km minimum.", floor_km)
            }
            Advisory::NoEasyDays {
                target_km,
                planned_km,
            } => write!(
                f,
                "No easy days fit this week; planned {} km across the key sessions (target {} km).",
                planned_km, target_km
            ),
            Advisory::QualityReduced { requested, placed } => write!(
                f,
                "Only {} of {} quality sessions fit the running days available; extra sessions dropped.",
                placed, requested
            ),
            Advisory::LongRunCapped {
                stage_km,
                capped_km,
            } => write!(
                f,
                "Long run capped at {} km (stage distance {} km) to stay within half the weekly volume.",
                capped_km, stage_km
            ),
            Advisory::LongRunCutback { stage } => write!(
                f,
                "Two long runs at stage 3 or above in a row: cut back to stage {} this week.",
                stage
            ),
            Advisory::StageFourHold => write!(
                f,
                "Stage {} long run already completed: holding at stage 3.",
                MAX_STAGE
            ),
            Advisory::LargeJump {
                previous_km,
                planned_km,
            } => write!(
                f,
                "Weekly volume jumps from {} km to {} km (25% or more). Check fatigue and soreness, and cut back if needed.",
                previous_km, planned_km
            ),
            Advisory::PhaseFocus(phase) => f.write_str(phase_focus(*phase)),
            Advisory::RecoveryWeek => f.write_str(
                "No quality sessions this week: a recovery-focused week. Watch for injury signals at easy pace.",
            ),
            Advisory::DoubleQuality => f.write_str(
                "Two or more quality sessions this week. Prioritise sleep and fuelling on the days between them.",
            ),
            Advisory::RaceSimulation { stage } => write!(
                f,
                "This stage {} long run is close to race simulation. Rehearse fuelling and pacing strategy.",
                stage
            ),
            Advisory::Fatigue(score) => write!(
                f,
                "Fatigue score {}/10 is high. The plan is unchanged, but consider swapping a quality day for easy running.",
                score
            ),
            Advisory::Elevation(gain) => write!(
                f,
                "Weekly elevation gain of {} m adds load not counted in distance. Keep hilly runs at easy effort.",
                gain
            ),
            Advisory::StreakExceeded(days) => write!(
                f,
                "{} consecutive running days could not be avoided at this frequency.",
                days
            ),
            Advisory::RaceDayWeek => f.write_str(
                "Race week: the marathon and recovery days only. No training runs planned.",
            ),
            Advisory::SingleRunBeforeRace { distance_km } => write!(
                f,
                "Only one running day before the race: {} km easy with strides to hold the weekly floor.",
                distance_km
            ),
        }
    }
}

fn phase_focus(phase: Phase) -> &'static str {
    match phase {
        Phase::Base => "BASE phase: build aerobic base and easy volume. Focus on distance and weekly rhythm rather than pace.",
        Phase::Build => "BUILD phase: protect recovery after quality sessions while gradually sharpening the back half of the long run.",
        Phase::Peak => "PEAK phase: develop race-pace feel. Rehearse fuelling and pacing in the long run and key workouts.",
        Phase::Taper => "TAPER phase: reduce volume and maximise recovery. Prioritise sleep, nutrition and stress management.",
    }
}

/// Inputs for the end-of-week summary notes
#[derive(Debug, Clone, Copy)]
pub struct WeekSummary {
    pub phase: Phase,
    pub previous_weekly_km: Decimal,
    pub planned_weekly_km: Decimal,
    pub quality_sessions: usize,
    pub long_run_stage: u8,
    pub long_run_km: Decimal,
    pub fatigue_score: Option<u8>,
    pub weekly_elevation_gain_m: Option<Decimal>,
}

/// Notes appended after the week is assembled
pub fn summary_notes(summary: &WeekSummary) -> Vec<Advisory> {
    let mut notes = Vec::new();

    if summary.previous_weekly_km > Decimal::ZERO
        && summary.planned_weekly_km / summary.previous_weekly_km >= LARGE_JUMP_RATIO
    {
        notes.push(Advisory::LargeJump {
            previous_km: summary.previous_weekly_km,
            planned_km: summary.planned_weekly_km,
        });
    }

    notes.push(Advisory::PhaseFocus(summary.phase));

    match summary.quality_sessions {
        0 => notes.push(Advisory::RecoveryWeek),
        1 => {}
        _ => notes.push(Advisory::DoubleQuality),
    }

    if summary.long_run_stage >= 3 && summary.long_run_km >= RACE_SIMULATION_KM {
        notes.push(Advisory::RaceSimulation {
            stage: summary.long_run_stage,
        });
    }

    if let Some(score) = summary.fatigue_score {
        if score >= FATIGUE_ADVISORY_SCORE {
            notes.push(Advisory::Fatigue(score));
        }
    }
    if let Some(gain) = summary.weekly_elevation_gain_m {
        if gain >= ELEVATION_ADVISORY_M {
            notes.push(Advisory::Elevation(gain));
        }
    }

    notes
}

pub fn render(advisories: &[Advisory]) -> Vec<String> {
    advisories.iter().map(ToString::to_string).collect()
}
