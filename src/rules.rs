//! Coaching rule tables
//!
//! Every threshold the planning pipeline uses lives here as a named constant
//! or a small lookup function, so the tables can be checked on their own.

use chrono::Weekday;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{GoalTier, Phase, SessionType};

pub const MARATHON_KM: Decimal = dec!(42.195);

/// Distances are planned to 0.1 km
pub const DISTANCE_DP: u32 = 1;

// Phase boundaries, in whole weeks remaining until race day
pub const BASE_MIN_WEEKS: u32 = 13;
pub const BUILD_MIN_WEEKS: u32 = 7;
pub const PEAK_MIN_WEEKS: u32 = 4;

/// Goal pace / current pace below this ratio is a stretch goal (G1)
pub const GOAL_STRETCH_RATIO: Decimal = dec!(0.935);

// Weekly volume
pub const MAX_WEEKLY_GROWTH: Decimal = dec!(1.10);
pub const INJURY_GROWTH_CEILING: Decimal = dec!(1.05);
pub const RACE_WEEK_FLOOR_KM: Decimal = dec!(16);
pub const MIN_WEEKLY_KM: Decimal = dec!(12);
pub const MIN_EASY_KM: Decimal = dec!(3);
pub const LARGE_JUMP_RATIO: Decimal = dec!(1.25);

/// Peak weekly volume a tier builds towards
pub fn tier_volume_ceiling(tier: GoalTier) -> Decimal {
    match tier {
        GoalTier::G1 => dec!(82),
        GoalTier::G2 => dec!(75),
        GoalTier::G3 => dec!(60),
    }
}

/// Week-over-week growth factor before injury and ceiling caps
pub fn growth_factor(phase: Phase, tier: GoalTier) -> Decimal {
    match (phase, tier) {
        (Phase::Base | Phase::Build, GoalTier::G1) => dec!(1.10),
        (Phase::Base | Phase::Build, GoalTier::G2) => dec!(1.08),
        (Phase::Base | Phase::Build, GoalTier::G3) => dec!(1.05),
        (Phase::Peak, _) => Decimal::ONE,
        (Phase::Taper, _) => Decimal::ONE,
    }
}

/// Share of the previous week's volume kept during taper
pub fn taper_volume_multiplier(weeks_remaining: u32) -> Decimal {
    match weeks_remaining {
        0 | 1 => dec!(0.60),
        2 => dec!(0.75),
        _ => dec!(0.85),
    }
}

// Long run
pub const MAX_LONG_RUN_KM: Decimal = dec!(32);
pub const MAX_LONG_RUN_FRACTION: Decimal = dec!(0.5);
pub const RACE_WEEK_LONG_RUN_KM: Decimal = dec!(4);
pub const MIN_STAGE: u8 = 1;
pub const MAX_STAGE: u8 = 4;
/// Two consecutive long runs at or above this stage trigger a cut-back week
pub const CUTBACK_STAGE: u8 = 3;
pub const CUTBACK_TO_STAGE: u8 = 2;
pub const RACE_SIMULATION_KM: Decimal = dec!(28);

/// Long-run distance for each stage
pub const STAGE_DISTANCES: [(u8, Decimal); 4] = [
    (1, dec!(20)),
    (2, dec!(24)),
    (3, dec!(28)),
    (4, dec!(32)),
];

pub fn stage_distance(stage: u8) -> Decimal {
    STAGE_DISTANCES
        .iter()
        .find(|(s, _)| *s == stage)
        .map(|(_, km)| *km)
        .unwrap_or(STAGE_DISTANCES[0].1)
}

/// Highest long-run stage allowed in a phase
pub fn max_stage(phase: Phase, tier: GoalTier) -> u8 {
    match (phase, tier) {
        (Phase::Base, _) => 2,
        (Phase::Build, _) => 3,
        (Phase::Peak, GoalTier::G3) => 3,
        (Phase::Peak, _) => 4,
        (Phase::Taper, _) => 2,
    }
}

/// Stepwise taper long run: (distance, stage)
pub fn taper_long_run(weeks_remaining: u32) -> (Decimal, u8) {
    match weeks_remaining {
        0 | 1 => (RACE_WEEK_LONG_RUN_KM, 1),
        2 => (dec!(16), 1),
        _ => (dec!(22), 2),
    }
}

/// Fraction of the long run finished at marathon pace
pub fn mp_finish_fraction(tier: GoalTier, stage: u8) -> Decimal {
    if stage <= 1 {
        return Decimal::ZERO;
    }
    match (tier, stage >= MAX_STAGE) {
        (GoalTier::G1, false) => dec!(0.30),
        (GoalTier::G1, true) => dec!(0.35),
        (GoalTier::G2, false) => dec!(0.20),
        (GoalTier::G2, true) => dec!(0.25),
        (GoalTier::G3, _) => Decimal::ZERO,
    }
}

// Quality sessions

/// Ordered quality sessions for a week
pub fn quality_plan(phase: Phase, tier: GoalTier, weeks_remaining: u32) -> &'static [SessionType] {
    use SessionType::{Interval, MarathonPace, Tempo};
    match (phase, tier) {
        (Phase::Base, GoalTier::G3) => &[],
        (Phase::Base, _) => &[Tempo],
        (Phase::Build, GoalTier::G1) => &[MarathonPace, Tempo],
        (Phase::Build, _) => &[Tempo],
        (Phase::Peak, GoalTier::G1) => &[MarathonPace, Tempo],
        (Phase::Peak, GoalTier::G2) => &[Tempo, Interval],
        (Phase::Peak, GoalTier::G3) => &[Tempo],
        (Phase::Taper, _) => match weeks_remaining {
            0 | 1 => &[],
            _ => &[MarathonPace],
        },
    }
}

/// Distance and structure of a quality session in a given phase
pub fn quality_workout(phase: Phase, session: SessionType) -> (Decimal, &'static str) {
    match (phase, session) {
        (Phase::Base, _) => (dec!(10), "2 km warm-up / 6 km tempo / 2 km easy"),
        (Phase::Build, SessionType::MarathonPace) => (dec!(12), "3 km warm-up / 6 km MP / 3 km easy"),
        (Phase::Build, _) => (dec!(12), "2 km warm-up / 8 km tempo / 2 km easy"),
        (Phase::Peak, SessionType::Interval) => {
            (dec!(12), "3 km warm-up / 5 x 1 km @ interval (400 m jog) / 3 km easy")
        }
        (Phase::Peak, SessionType::MarathonPace) => (dec!(14), "3 km warm-up / 8 km MP / 3 km easy"),
        (Phase::Peak, _) => (dec!(14), "3 km warm-up / 8 km tempo / 3 km easy"),
        (Phase::Taper, _) => (dec!(10), "2 km warm-up / 6 km steady MP / 2 km easy"),
    }
}

// Pace bands, seconds per km relative to a base pace

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaceOffset {
    pub fast: i32,
    pub slow: i32,
}

pub const MIN_PACE_SECONDS: u32 = 120;
pub const EASY_OFFSET: PaceOffset = PaceOffset { fast: 45, slow: 75 };
pub const MARATHON_OFFSET: PaceOffset = PaceOffset { fast: -5, slow: 5 };
pub const TEMPO_OFFSET: PaceOffset = PaceOffset { fast: -25, slow: -15 };
pub const INTERVAL_OFFSET: PaceOffset = PaceOffset { fast: -65, slow: -40 };
/// Taper marathon-pace work runs a little slower than goal pace
pub const TAPER_OFFSET: PaceOffset = PaceOffset { fast: 5, slow: 15 };

/// Long-run offsets from current pace, indexed by stage - 1
pub const LONG_OFFSETS: [PaceOffset; 4] = [
    PaceOffset { fast: 40, slow: 70 },
    PaceOffset { fast: 25, slow: 55 },
    PaceOffset { fast: 15, slow: 45 },
    PaceOffset { fast: 5, slow: 25 },
];

// Weekly layout
pub const MAX_RUN_DAYS: u8 = 6;
pub const RACE_WEEK_MAX_RUN_DAYS: u8 = 4;
pub const MAX_CONSECUTIVE_RUN_DAYS: usize = 4;
pub const LONG_RUN_WEEKDAY: Weekday = Weekday::Sun;
pub const QUALITY_WEEKDAYS: [Weekday; 2] = [Weekday::Tue, Weekday::Thu];

/// Running days per week when the runner does not give one
pub fn default_frequency(weekly_km: Decimal) -> u8 {
    if weekly_km < dec!(30) {
        4
    } else if weekly_km < dec!(55) {
        5
    } else {
        6
    }
}

// Advisory thresholds; these only produce notes
pub const FATIGUE_ADVISORY_SCORE: u8 = 7;
pub const ELEVATION_ADVISORY_M: Decimal = dec!(800);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_table_is_increasing_and_capped() {
        for pair in STAGE_DISTANCES.windows(2) {
            assert!(pair[0].1 < pair[1].1);
            assert_eq!(pair[0].0 + 1, pair[1].0);
        }
        assert_eq!(stage_distance(MAX_STAGE), MAX_LONG_RUN_KM);
        assert_eq!(stage_distance(9), dec!(20));
    }

    #[test]
    fn test_growth_never_exceeds_weekly_cap() {
        for phase in [Phase::Base, Phase::Build, Phase::Peak, Phase::Taper] {
            for tier in [GoalTier::G1, GoalTier::G2, GoalTier::G3] {
                assert!(growth_factor(phase, tier) <= MAX_WEEKLY_GROWTH);
                assert!(growth_factor(phase, tier) >= Decimal::ONE);
            }
        }
        assert!(INJURY_GROWTH_CEILING < growth_factor(Phase::Build, GoalTier::G2));
    }

    #[test]
    fn test_taper_schedule_decreases() {
        assert!(taper_volume_multiplier(3) > taper_volume_multiplier(2));
        assert!(taper_volume_multiplier(2) > taper_volume_multiplier(1));
        assert!(taper_long_run(3).0 > taper_long_run(2).0);
        assert!(taper_long_run(2).0 > taper_long_run(1).0);
        assert_eq!(taper_long_run(1).0, RACE_WEEK_LONG_RUN_KM);
    }

    #[test]
    fn test_quality_table_limits() {
        for tier in [GoalTier::G1, GoalTier::G2, GoalTier::G3] {
            assert!(quality_plan(Phase::Base, tier, 20).len() <= 1);
            assert!(quality_plan(Phase::Taper, tier, 1).is_empty());
            for phase in [Phase::Build, Phase::Peak] {
                let sessions = quality_plan(phase, tier, 8);
                assert!((1..=2).contains(&sessions.len()));
                assert!(sessions.iter().all(|s| s.is_quality()));
            }
        }
        assert!(quality_plan(Phase::Base, GoalTier::G3, 20).is_empty());
    }

    #[test]
    fn test_pace_offsets_are_ordered() {
        for offset in [
            EASY_OFFSET,
            MARATHON_OFFSET,
            TEMPO_OFFSET,
            INTERVAL_OFFSET,
            TAPER_OFFSET,
        ] {
            assert!(offset.fast < offset.slow);
        }
        for pair in LONG_OFFSETS.windows(2) {
            assert!(pair[0].fast > pair[1].fast);
        }
        assert!(LONG_OFFSETS.iter().all(|o| o.fast < EASY_OFFSET.fast));
        assert!(TAPER_OFFSET.fast > MARATHON_OFFSET.slow);
    }

    #[test]
    fn test_default_frequency() {
        assert_eq!(default_frequency(dec!(25)), 4);
        assert_eq!(default_frequency(dec!(40)), 5);
        assert_eq!(default_frequency(dec!(55)), 6);
    }
}
