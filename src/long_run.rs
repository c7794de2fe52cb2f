use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{GoalTier, Phase, TrainingHistory};
use crate::notes::Advisory;
use crate::rules::{
    max_stage, stage_distance, taper_long_run, CUTBACK_STAGE, CUTBACK_TO_STAGE, DISTANCE_DP,
    MAX_LONG_RUN_FRACTION, MAX_LONG_RUN_KM, MAX_STAGE, MIN_STAGE, STAGE_DISTANCES,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LongRunPlan {
    pub distance_km: Decimal,
    pub stage: u8,
    pub advisories: Vec<Advisory>,
}

/// Highest stage whose distance the runner has already covered
pub fn baseline_stage(long_run_km: Decimal) -> u8 {
    STAGE_DISTANCES
        .iter()
        .filter(|(_, km)| *km <= long_run_km)
        .map(|(stage, _)| *stage)
        .max()
        .unwrap_or(MIN_STAGE)
}

/// Plan the week's long run.
///
/// `recent_long_km` is the last long run completed (or assumed); `history`
/// holds the weeks already resolved in this cycle.
pub fn plan_long_run(
    phase: Phase,
    tier: GoalTier,
    weeks_remaining: u32,
    recent_long_km: Decimal,
    target_weekly_km: Decimal,
    history: &TrainingHistory,
) -> LongRunPlan {
    let mut advisories = Vec::new();

    if weeks_remaining <= 1 {
        let (distance_km, stage) = taper_long_run(weeks_remaining);
        return LongRunPlan {
            distance_km,
            stage,
            advisories,
        };
    }

    let (stage_km, stage) = if phase == Phase::Taper {
        taper_long_run(weeks_remaining)
    } else {
        let mut stage = (baseline_stage(recent_long_km) + 1).min(max_stage(phase, tier));
        if let Some(previous) = history.last() {
            stage = stage.min(previous.planned_stage + 1);
        }

        let stage_four_done = history
            .entries()
            .iter()
            .any(|entry| baseline_stage(entry.long_run_km) >= MAX_STAGE);
        if stage >= MAX_STAGE && stage_four_done {
            advisories.push(Advisory::StageFourHold);
            stage = MAX_STAGE - 1;
        }

        let recent = history.recent(2);
        let heavy_streak = recent.len() == 2
            && recent
                .iter()
                .all(|entry| baseline_stage(entry.long_run_km) >= CUTBACK_STAGE);
        if stage > CUTBACK_TO_STAGE && heavy_streak {
            advisories.push(Advisory::LongRunCutback {
                stage: CUTBACK_TO_STAGE,
            });
            stage = CUTBACK_TO_STAGE;
        }

        (stage_distance(stage), stage)
    };

    // Capped on the target; weeks with easy days never plan below it
    let fraction_cap = (target_weekly_km * MAX_LONG_RUN_FRACTION).round_dp(DISTANCE_DP);
    let distance_km = stage_km.min(MAX_LONG_RUN_KM).min(fraction_cap);
    let stage = if distance_km < stage_km {
        advisories.push(Advisory::LongRunCapped {
            stage_km,
            capped_km: distance_km,
        });
        stage.min(baseline_stage(distance_km))
    } else {
        stage
    };

    debug!(
        "Long run: stage {} at {} km (recent {} km, {:?})",
        stage, distance_km, recent_long_km, phase
    );

    LongRunPlan {
        distance_km,
        stage,
        advisories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HistoryEntry;
    use rust_decimal_macros::dec;

    fn history(long_runs: &[(Decimal, u8)]) -> TrainingHistory {
        let mut history = TrainingHistory::new();
        for (km, stage) in long_runs {
            history.record(HistoryEntry {
                weekly_km: dec!(60),
                long_run_km: *km,
                planned_stage: *stage,
            });
        }
        history
    }

    #[test]
    fn test_baseline_stage() {
        assert_eq!(baseline_stage(dec!(12)), 1);
        assert_eq!(baseline_stage(dec!(24)), 2);
        assert_eq!(baseline_stage(dec!(27.9)), 2);
        assert_eq!(baseline_stage(dec!(35)), 4);
    }

    #[test]
    fn test_stage_advances_one_tier_from_baseline() {
        let plan = plan_long_run(Phase::Build, GoalTier::G2, 12, dec!(24), dec!(64.8), &TrainingHistory::new());
        assert_eq!(plan.stage, 3);
        assert_eq!(plan.distance_km, dec!(28));
        assert!(plan.advisories.is_empty());
    }

    #[test]
    fn test_phase_limits_stage() {
        let plan = plan_long_run(Phase::Base, GoalTier::G1, 16, dec!(30), dec!(70), &TrainingHistory::new());
        assert_eq!(plan.stage, 2);
        assert_eq!(plan.distance_km, dec!(24));
    }

    #[test]
    fn test_never_more_than_one_tier_per_week() {
        // Overshoot: actual long run of 32 km after a planned stage 1 week
        let prior = history(&[(dec!(20), 1)]);
        let plan = plan_long_run(Phase::Peak, GoalTier::G1, 5, dec!(32), dec!(80), &prior);
        assert_eq!(plan.stage, 2);
    }

    #[test]
    fn test_undershoot_lowers_stage() {
        let prior = history(&[(dec!(18), 3)]);
        let plan = plan_long_run(Phase::Build, GoalTier::G2, 9, dec!(18), dec!(70), &prior);
        assert_eq!(plan.stage, 2);
    }

    #[test]
    fn test_cutback_after_two_heavy_weeks() {
        let prior = history(&[(dec!(28), 3), (dec!(28), 3)]);
        let plan = plan_long_run(Phase::Build, GoalTier::G2, 8, dec!(28), dec!(70), &prior);
        assert_eq!(plan.stage, 2);
        assert_eq!(plan.distance_km, dec!(24));
        assert_eq!(plan.advisories, vec![Advisory::LongRunCutback { stage: 2 }]);
    }

    #[test]
    fn test_stage_four_is_held_after_one_run() {
        let prior = history(&[(dec!(24), 2), (dec!(32), 4)]);
        let plan = plan_long_run(Phase::Peak, GoalTier::G1, 5, dec!(32), dec!(82), &prior);
        assert_eq!(plan.stage, 3);
        assert!(plan.advisories.contains(&Advisory::StageFourHold));
    }

    #[test]
    fn test_fraction_cap_lowers_reported_stage() {
        let plan = plan_long_run(Phase::Build, GoalTier::G2, 10, dec!(24), dec!(40), &TrainingHistory::new());
        assert_eq!(plan.distance_km, dec!(20));
        assert_eq!(plan.stage, 1);
        assert!(matches!(plan.advisories[0], Advisory::LongRunCapped { .. }));
    }

    #[test]
    fn test_taper_steps_and_race_week() {
        let prior = history(&[(dec!(32), 4)]);
        let three_out = plan_long_run(Phase::Taper, GoalTier::G1, 3, dec!(32), dec!(60), &prior);
        assert_eq!((three_out.distance_km, three_out.stage), (dec!(22), 2));
        let two_out = plan_long_run(Phase::Taper, GoalTier::G1, 2, dec!(22), dec!(45), &prior);
        assert_eq!((two_out.distance_km, two_out.stage), (dec!(16), 1));
        let race_week = plan_long_run(Phase::Taper, GoalTier::G1, 1, dec!(32), dec!(5), &prior);
        assert_eq!(race_week.distance_km, dec!(4));
        assert!(race_week.advisories.is_empty());
    }
}
