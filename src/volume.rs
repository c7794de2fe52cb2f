//! Weekly volume heuristic
//!
//! Computes the target weekly distance from the carried baseline, then
//! reconciles it with the sessions that must fit into the week.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{GoalTier, Phase};
use crate::notes::Advisory;
use crate::rules::{
    growth_factor, taper_volume_multiplier, tier_volume_ceiling, DISTANCE_DP,
    INJURY_GROWTH_CEILING, MAX_WEEKLY_GROWTH, MIN_EASY_KM, MIN_WEEKLY_KM, RACE_WEEK_FLOOR_KM,
};

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeTarget {
    pub baseline_km: Decimal,
    pub target_km: Decimal,
    /// Factor applied to the baseline before ceilings and floors
    pub growth_factor: Decimal,
    pub advisories: Vec<Advisory>,
}

/// Target weekly distance for one week.
///
/// `baseline_km` is last week's actual (or assumed) distance.
pub fn weekly_target(
    baseline_km: Decimal,
    phase: Phase,
    tier: GoalTier,
    weeks_remaining: u32,
    injury_flag: bool,
) -> VolumeTarget {
    let mut advisories = Vec::new();
    let ceiling = tier_volume_ceiling(tier);

    let (factor, target) = match phase {
        Phase::Base | Phase::Build => {
            let mut factor = growth_factor(phase, tier).min(MAX_WEEKLY_GROWTH);
            if injury_flag {
                factor = factor.min(INJURY_GROWTH_CEILING);
            }
            if baseline_km >= ceiling {
                advisories.push(Advisory::VolumeCeiling { ceiling_km: ceiling });
                (factor, ceiling)
            } else {
                let grown = baseline_km * factor;
                if grown > ceiling {
                    advisories.push(Advisory::VolumeCeiling { ceiling_km: ceiling });
                }
                (factor, grown.min(ceiling))
            }
        }
        Phase::Peak => {
            let factor = growth_factor(phase, tier);
            if baseline_km > ceiling {
                advisories.push(Advisory::VolumeCeiling { ceiling_km: ceiling });
            }
            (factor, (baseline_km * factor).min(ceiling))
        }
        Phase::Taper => {
            let multiplier = taper_volume_multiplier(weeks_remaining);
            advisories.push(Advisory::TaperReduction { multiplier });
            let mut target = baseline_km * multiplier;
            if weeks_remaining <= 1 && target < RACE_WEEK_FLOOR_KM {
                advisories.push(Advisory::RaceWeekFloor {
                    floor_km: RACE_WEEK_FLOOR_KM,
                });
                target = RACE_WEEK_FLOOR_KM;
            }
            (multiplier, target)
        }
    };

    if injury_flag {
        let capped = match phase {
            Phase::Base | Phase::Build => factor,
            Phase::Peak | Phase::Taper => factor.min(Decimal::ONE),
        };
        advisories.insert(0, Advisory::InjuryGrowthCap { factor: capped });
    }

    let target_km = target.round_dp(DISTANCE_DP);
    debug!(
        "Volume target: baseline {} km x {} -> {} km ({:?}, {:?})",
        baseline_km, factor, target_km, phase, tier
    );

    VolumeTarget {
        baseline_km,
        target_km,
        growth_factor: factor,
        advisories,
    }
}

/// Planned weekly distance after fitting the fixed sessions
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub planned_km: Decimal,
    pub advisories: Vec<Advisory>,
}

/// Fit the long run, quality sessions and easy days into the target.
///
/// The result never drops below the weekly floor, and each easy day gets at
/// least the minimum easy distance. Without easy days the fixed sessions set
/// the week, raised to the floor when they fall short; the caller adds that
/// difference to the long run.
pub fn reconcile(
    target_km: Decimal,
    long_run_km: Decimal,
    quality_km: Decimal,
    easy_days: usize,
) -> Reconciled {
    let fixed = long_run_km + quality_km;
    let mut advisories = Vec::new();

    if easy_days == 0 {
        let mut planned_km = fixed;
        if planned_km < MIN_WEEKLY_KM {
            advisories.push(Advisory::WeeklyFloor {
                floor_km: MIN_WEEKLY_KM,
            });
            planned_km = MIN_WEEKLY_KM;
        }
        if planned_km != target_km {
            advisories.push(Advisory::NoEasyDays {
                target_km,
                planned_km,
            });
        }
        return Reconciled {
            planned_km,
            advisories,
        };
    }

    let mut planned_km = target_km;
    if planned_km < MIN_WEEKLY_KM {
        advisories.push(Advisory::WeeklyFloor {
            floor_km: MIN_WEEKLY_KM,
        });
        planned_km = MIN_WEEKLY_KM;
    }

    let feasible = fixed + MIN_EASY_KM * Decimal::from(easy_days as u64);
    if planned_km < feasible {
        advisories.push(Advisory::RaisedToFeasible {
            target_km,
            planned_km: feasible,
        });
        planned_km = feasible;
    }

    Reconciled {
        planned_km,
        advisories,
    }
}
