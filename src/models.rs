use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ConfigError;
use crate::rules;

/// Training phase, ordered from furthest to closest to race day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    Base,
    Build,
    Peak,
    Taper,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Base => "BASE",
            Phase::Build => "BUILD",
            Phase::Peak => "PEAK",
            Phase::Taper => "TAPER",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How ambitious the goal pace is relative to current marathon pace.
///
/// G1 is the most aggressive tier, G3 the most conservative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GoalTier {
    G1,
    G2,
    G3,
}

impl GoalTier {
    pub fn label(&self) -> &'static str {
        match self {
            GoalTier::G1 => "G1",
            GoalTier::G2 => "G2",
            GoalTier::G3 => "G3",
        }
    }
}

impl fmt::Display for GoalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Session types placed on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    Rest,
    Easy,
    Long,
    Tempo,
    Interval,
    MarathonPace,
}

impl SessionType {
    /// Tempo, Interval and Marathon-Pace sessions
    pub fn is_quality(&self) -> bool {
        matches!(
            self,
            SessionType::Tempo | SessionType::Interval | SessionType::MarathonPace
        )
    }

    pub fn is_running(&self) -> bool {
        !matches!(self, SessionType::Rest)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Rest => "Rest",
            SessionType::Easy => "Easy",
            SessionType::Long => "Long Run",
            SessionType::Tempo => "Tempo",
            SessionType::Interval => "Interval",
            SessionType::MarathonPace => "Marathon Pace",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pace in whole seconds per kilometre
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pace(u32);

impl Pace {
    pub fn from_seconds(seconds: u32) -> Self {
        Pace(seconds)
    }

    pub fn seconds(&self) -> u32 {
        self.0
    }

    /// Shift the pace by `delta` seconds, never going below the minimum pace
    pub fn offset(&self, delta: i32) -> Pace {
        let shifted = i64::from(self.0) + i64::from(delta);
        let floor = i64::from(rules::MIN_PACE_SECONDS);
        Pace(shifted.max(floor) as u32)
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}/km", self.0 / 60, self.0 % 60)
    }
}

/// Prescribed pace band; `fast` is the lower duration bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaceRange {
    pub fast: Pace,
    pub slow: Pace,
}

impl PaceRange {
    /// Band around `base` using a (fast, slow) offset pair in seconds
    pub fn around(base: Pace, offset: rules::PaceOffset) -> Self {
        PaceRange {
            fast: base.offset(offset.fast),
            slow: base.offset(offset.slow),
        }
    }

    pub fn contains(&self, pace: Pace) -> bool {
        pace >= self.fast && pace <= self.slow
    }
}

impl fmt::Display for PaceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.fast, self.slow)
    }
}

/// Validated planning input.
///
/// Build it with [`crate::normalize::RunnerInput::normalize`]; the engine
/// entry points re-check it with [`PlanConfig::validate`] before planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    pub race_date: NaiveDate,
    /// Recent weekly distance in km
    pub recent_weekly_km: Decimal,
    /// Most recent long run in km
    pub recent_long_km: Decimal,
    /// Goal marathon finish time in seconds
    pub goal_marathon_time_secs: u32,
    /// Current demonstrated marathon pace
    pub current_marathon_pace: Pace,
    pub injury_flag: bool,
    /// Recent weekly elevation gain in metres (advisory only)
    pub weekly_elevation_gain_m: Option<Decimal>,
    /// Self-reported fatigue, 0-10 (advisory only)
    pub fatigue_score: Option<u8>,
    /// Running days per week; derived from volume when absent
    pub weekly_frequency: Option<u8>,
}

impl PlanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recent_weekly_km <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveDistance {
                field: "recent_weekly_km".to_string(),
                value: self.recent_weekly_km,
            });
        }
        if self.recent_long_km <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveDistance {
                field: "recent_long_km".to_string(),
                value: self.recent_long_km,
            });
        }
        if self.goal_marathon_time_secs == 0 {
            return Err(ConfigError::InvalidTime {
                field: "goal_marathon_time".to_string(),
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.current_marathon_pace.seconds() == 0 {
            return Err(ConfigError::InvalidPace {
                field: "current_mp".to_string(),
                value: self.current_marathon_pace.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if let Some(score) = self.fatigue_score {
            if score > 10 {
                return Err(ConfigError::FatigueOutOfRange(score));
            }
        }
        if let Some(days) = self.weekly_frequency {
            if !(1..=7).contains(&days) {
                return Err(ConfigError::InvalidFrequency(days));
            }
        }
        if let Some(gain) = self.weekly_elevation_gain_m {
            if gain < Decimal::ZERO {
                return Err(ConfigError::NegativeElevation(gain));
            }
        }
        Ok(())
    }
}

/// One calendar day of a week plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySession {
    pub date: NaiveDate,
    pub weekday: String,
    pub session_type: SessionType,
    /// Zero for rest days
    pub distance_km: Decimal,
    /// Absent for rest days
    pub pace_range: Option<PaceRange>,
    /// Workout structure, e.g. warm-up / main set / cool-down
    pub structure: String,
    pub note: String,
}

impl DaySession {
    pub fn rest(date: NaiveDate, structure: &str, note: &str) -> Self {
        DaySession {
            date,
            weekday: date.weekday().to_string(),
            session_type: SessionType::Rest,
            distance_km: Decimal::ZERO,
            pace_range: None,
            structure: structure.to_string(),
            note: note.to_string(),
        }
    }
}

/// Actual distance a runner completed in a week
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActualMileage {
    pub weekly_km: Decimal,
    pub long_run_km: Option<Decimal>,
}

/// Actual-mileage overrides keyed by zero-based week index
pub type HistoryOverrides = BTreeMap<usize, ActualMileage>;

/// Result of one run of the single-week pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    /// Zero-based week index within the cycle
    pub index: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub phase: Phase,
    pub goal_tier: GoalTier,
    pub weeks_to_race: u32,
    /// Weekly distance the heuristic grew from
    pub baseline_weekly_km: Decimal,
    pub target_weekly_km: Decimal,
    /// Sum of the day distances; may differ from the target after feasibility adjustments
    pub planned_weekly_km: Decimal,
    pub quality_sessions: usize,
    pub long_run_km: Decimal,
    pub long_run_stage: u8,
    pub days: Vec<DaySession>,
    pub notes: Vec<String>,
    /// Actual mileage recorded for this week, if supplied
    pub actual: Option<ActualMileage>,
}

impl WeekPlan {
    pub fn total_distance(&self) -> Decimal {
        self.days.iter().map(|d| d.distance_km).sum()
    }

    pub fn sessions_of(&self, session_type: SessionType) -> impl Iterator<Item = &DaySession> {
        self.days
            .iter()
            .filter(move |d| d.session_type == session_type)
    }

    pub fn is_race_week(&self) -> bool {
        self.weeks_to_race <= 1
    }
}

/// One completed (or assumed completed) week in the cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub weekly_km: Decimal,
    pub long_run_km: Decimal,
    /// Long-run stage that was planned for the week
    pub planned_stage: u8,
}

/// Append-only record of the weeks already resolved in a cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    entries: Vec<HistoryEntry>,
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `count` most recent entries, newest last
    pub fn recent(&self, count: usize) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(count);
        &self.entries[start..]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

/// A full training cycle from the start week to race week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiWeekPlan {
    pub start_date: NaiveDate,
    pub race_date: NaiveDate,
    /// Config the cycle was generated from
    pub config: PlanConfig,
    pub weeks: Vec<WeekPlan>,
}

impl MultiWeekPlan {
    pub fn week(&self, index: usize) -> Option<&WeekPlan> {
        self.weeks.get(index)
    }

    pub fn total_planned_km(&self) -> Decimal {
        self.weeks.iter().map(|w| w.planned_weekly_km).sum()
    }
}
