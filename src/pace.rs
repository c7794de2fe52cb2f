use serde::{Deserialize, Serialize};

use crate::models::{Pace, PaceRange, Phase, SessionType};
use crate::rules::{
    EASY_OFFSET, INTERVAL_OFFSET, LONG_OFFSETS, MARATHON_OFFSET, MAX_STAGE, MIN_STAGE,
    TAPER_OFFSET, TEMPO_OFFSET,
};

/// Pace bands for every running session type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaceBands {
    pub goal: Pace,
    pub current: Pace,
    pub easy: PaceRange,
    pub marathon: PaceRange,
    pub tempo: PaceRange,
    pub interval: PaceRange,
    /// Marathon-pace work during the taper
    pub taper: PaceRange,
    /// Long-run band for stages 1 to 4
    pub long_by_stage: [PaceRange; 4],
}

impl PaceBands {
    /// Easy and long runs key off current fitness, faster work off goal pace.
    pub fn calculate(goal: Pace, current: Pace) -> Self {
        Self {
            goal,
            current,
            easy: PaceRange::around(current, EASY_OFFSET),
            marathon: PaceRange::around(goal, MARATHON_OFFSET),
            tempo: PaceRange::around(goal, TEMPO_OFFSET),
            interval: PaceRange::around(goal, INTERVAL_OFFSET),
            taper: PaceRange::around(goal, TAPER_OFFSET),
            long_by_stage: LONG_OFFSETS.map(|offset| PaceRange::around(current, offset)),
        }
    }

    pub fn long(&self, stage: u8) -> PaceRange {
        let stage = stage.clamp(MIN_STAGE, MAX_STAGE);
        self.long_by_stage[usize::from(stage - 1)]
    }

    pub fn for_session(&self, session: SessionType, stage: u8) -> Option<PaceRange> {
        match session {
            SessionType::Rest => None,
            SessionType::Easy => Some(self.easy),
            SessionType::Long => Some(self.long(stage)),
            SessionType::Tempo => Some(self.tempo),
            SessionType::Interval => Some(self.interval),
            SessionType::MarathonPace => Some(self.marathon),
        }
    }

    /// Band for a quality session; taper marathon-pace runs use the taper band
    pub fn for_quality(&self, phase: Phase, session: SessionType) -> Option<PaceRange> {
        match (phase, session) {
            (Phase::Taper, SessionType::MarathonPace) => Some(self.taper),
            _ => self.for_session(session, MIN_STAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::MIN_PACE_SECONDS;
    use proptest::prelude::*;

    #[test]
    fn test_bands_for_sub_330_goal() {
        let bands = PaceBands::calculate(Pace::from_seconds(299), Pace::from_seconds(310));
        assert_eq!(bands.easy.fast.seconds(), 355);
        assert_eq!(bands.easy.slow.seconds(), 385);
        assert_eq!(bands.marathon.fast.seconds(), 294);
        assert_eq!(bands.marathon.slow.seconds(), 304);
        assert_eq!(bands.tempo.fast.seconds(), 274);
        assert_eq!(bands.interval.fast.seconds(), 234);
        assert_eq!(bands.long(1).fast.seconds(), 350);
        assert_eq!(bands.long(4).slow.seconds(), 335);
        assert_eq!(bands.easy.to_string(), "5:55/km ~ 6:25/km");
    }

    #[test]
    fn test_rest_has_no_band() {
        let bands = PaceBands::calculate(Pace::from_seconds(299), Pace::from_seconds(310));
        assert_eq!(bands.for_session(SessionType::Rest, 1), None);
        assert_eq!(bands.for_session(SessionType::Long, 9), Some(bands.long(4)));
        assert_eq!(bands.for_session(SessionType::Long, 0), Some(bands.long(1)));
    }

    #[test]
    fn test_taper_marathon_pace_is_eased() {
        let bands = PaceBands::calculate(Pace::from_seconds(299), Pace::from_seconds(310));
        assert_eq!(bands.taper.fast.seconds(), 304);
        assert_eq!(bands.taper.slow.seconds(), 314);
        assert_eq!(
            bands.for_quality(Phase::Taper, SessionType::MarathonPace),
            Some(bands.taper)
        );
        assert_eq!(
            bands.for_quality(Phase::Peak, SessionType::MarathonPace),
            Some(bands.marathon)
        );
        assert_eq!(
            bands.for_quality(Phase::Taper, SessionType::Tempo),
            Some(bands.tempo)
        );
    }

    #[test]
    fn test_very_fast_goal_is_clamped() {
        let bands = PaceBands::calculate(Pace::from_seconds(130), Pace::from_seconds(140));
        assert_eq!(bands.interval.fast.seconds(), MIN_PACE_SECONDS);
        assert_eq!(bands.interval.slow.seconds(), MIN_PACE_SECONDS);
    }

    proptest! {
        #[test]
        fn test_bands_always_positive_and_ordered(goal in 1u32..1200, current in 1u32..1200) {
            let bands = PaceBands::calculate(Pace::from_seconds(goal), Pace::from_seconds(current));
            let mut all = vec![bands.easy, bands.marathon, bands.tempo, bands.interval, bands.taper];
            all.extend(bands.long_by_stage);
            for band in all {
                prop_assert!(band.fast.seconds() >= MIN_PACE_SECONDS);
                prop_assert!(band.fast <= band.slow);
            }
        }
    }
}
