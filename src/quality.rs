use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{GoalTier, Phase, SessionType};
use crate::rules::{quality_plan, quality_workout};

/// A quality workout before it is placed on a weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySession {
    pub session_type: SessionType,
    pub distance_km: Decimal,
    pub structure: String,
    pub purpose: String,
}

/// Quality sessions for the week, in placement priority order
pub fn allocate(phase: Phase, tier: GoalTier, weeks_remaining: u32) -> Vec<QualitySession> {
    quality_plan(phase, tier, weeks_remaining)
        .iter()
        .map(|&session_type| {
            let (distance_km, structure) = quality_workout(phase, session_type);
            QualitySession {
                session_type,
                distance_km,
                structure: structure.to_string(),
                purpose: purpose(phase, session_type).to_string(),
            }
        })
        .collect()
}

pub fn total_distance(sessions: &[QualitySession]) -> Decimal {
    sessions.iter().map(|s| s.distance_km).sum()
}

fn purpose(phase: Phase, session: SessionType) -> &'static str {
    match (phase, session) {
        (Phase::Taper, _) => "Keep race rhythm",
        (_, SessionType::MarathonPace) => "Marathon-pace stamina",
        (_, SessionType::Interval) => "VO2max and running economy",
        (Phase::Base, _) => "Aerobic threshold",
        _ => "Lactate threshold",
    }
}
