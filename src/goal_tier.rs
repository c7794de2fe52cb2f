use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::{GoalTier, Pace, PlanConfig};
use crate::rules::{GOAL_STRETCH_RATIO, MARATHON_KM};

/// Pace required to run the marathon in `goal_time_secs`, rounded to the second
pub fn goal_pace(goal_time_secs: u32) -> Pace {
    let seconds = (Decimal::from(goal_time_secs) / MARATHON_KM).round();
    Pace::from_seconds(seconds.to_u32().unwrap_or(u32::MAX))
}

/// Classify a goal pace against the runner's current marathon pace.
///
/// Ratios sitting exactly on a boundary fall into the less aggressive tier.
pub fn resolve(goal: Pace, current: Pace) -> GoalTier {
    let ratio = Decimal::from(goal.seconds()) / Decimal::from(current.seconds().max(1));
    if ratio >= Decimal::ONE {
        GoalTier::G3
    } else if ratio >= GOAL_STRETCH_RATIO {
        GoalTier::G2
    } else {
        GoalTier::G1
    }
}

pub fn resolve_goal_tier(config: &PlanConfig) -> GoalTier {
    resolve(goal_pace(config.goal_marathon_time_secs), config.current_marathon_pace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_pace_from_finish_time() {
        assert_eq!(goal_pace(12_600).seconds(), 299);
        assert_eq!(goal_pace(3 * 3600).seconds(), 256);
    }

    #[test]
    fn test_tiers() {
        let current = Pace::from_seconds(310);
        assert_eq!(resolve(Pace::from_seconds(299), current), GoalTier::G2);
        assert_eq!(resolve(Pace::from_seconds(327), current), GoalTier::G3);
        assert_eq!(resolve(Pace::from_seconds(250), current), GoalTier::G1);
    }

    #[test]
    fn test_boundaries_resolve_to_less_aggressive_tier() {
        let current = Pace::from_seconds(400);
        // 374 / 400 = 0.935 exactly
        assert_eq!(resolve(Pace::from_seconds(374), current), GoalTier::G2);
        assert_eq!(resolve(Pace::from_seconds(373), current), GoalTier::G1);
        assert_eq!(resolve(Pace::from_seconds(400), current), GoalTier::G3);
        assert_eq!(resolve(Pace::from_seconds(399), current), GoalTier::G2);
    }
}
