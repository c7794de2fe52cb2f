use chrono::NaiveDate;

use crate::error::ConfigError;
use crate::models::Phase;
use crate::rules::{BASE_MIN_WEEKS, BUILD_MIN_WEEKS, PEAK_MIN_WEEKS};

/// Whole weeks until race day, rounded up.
///
/// Fails when the race is on or before the start date.
pub fn weeks_remaining(start_date: NaiveDate, race_date: NaiveDate) -> Result<u32, ConfigError> {
    let days = (race_date - start_date).num_days();
    if days <= 0 {
        return Err(ConfigError::RaceNotAfterStart {
            start_date,
            race_date,
        });
    }
    Ok(((days + 6) / 7) as u32)
}

/// Weeks from the start of a cycle week to race day; 0 when the week opens on race day.
///
/// Fails when the week starts after the race.
pub fn weeks_to_race(week_start: NaiveDate, race_date: NaiveDate) -> Result<u32, ConfigError> {
    if week_start == race_date {
        return Ok(0);
    }
    weeks_remaining(week_start, race_date)
}

/// Number of 7-day weeks from `start_date` needed to reach race day inclusive
pub fn cycle_weeks(start_date: NaiveDate, race_date: NaiveDate) -> Result<u32, ConfigError> {
    weeks_remaining(start_date, race_date)?;
    Ok(((race_date - start_date).num_days() / 7 + 1) as u32)
}

/// Map weeks remaining onto a training phase
pub fn classify(weeks_remaining: u32) -> Phase {
    if weeks_remaining >= BASE_MIN_WEEKS {
        Phase::Base
    } else if weeks_remaining >= BUILD_MIN_WEEKS {
        Phase::Build
    } else if weeks_remaining >= PEAK_MIN_WEEKS {
        Phase::Peak
    } else {
        Phase::Taper
    }
}

pub fn determine_phase(start_date: NaiveDate, race_date: NaiveDate) -> Result<Phase, ConfigError> {
    weeks_remaining(start_date, race_date).map(classify)
}

/// The final week before the race
pub fn is_race_week(weeks_remaining: u32) -> bool {
    weeks_remaining <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weeks_remaining_rounds_up() {
        let start = date(2025, 1, 6);
        assert_eq!(weeks_remaining(start, start + Duration::days(1)).unwrap(), 1);
        assert_eq!(weeks_remaining(start, start + Duration::days(7)).unwrap(), 1);
        assert_eq!(weeks_remaining(start, start + Duration::days(8)).unwrap(), 2);
        assert_eq!(weeks_remaining(start, date(2025, 3, 31)).unwrap(), 12);
    }

    #[test]
    fn test_cycle_reaches_race_day() {
        let start = date(2025, 1, 6);
        assert_eq!(cycle_weeks(start, start + Duration::days(1)).unwrap(), 1);
        assert_eq!(cycle_weeks(start, start + Duration::days(6)).unwrap(), 1);
        assert_eq!(cycle_weeks(start, start + Duration::days(7)).unwrap(), 2);
        assert_eq!(cycle_weeks(start, start + Duration::days(21)).unwrap(), 4);
        assert_eq!(cycle_weeks(start, date(2025, 3, 31)).unwrap(), 13);
        assert!(cycle_weeks(start, start).is_err());
    }

    #[test]
    fn test_week_opening_on_race_day() {
        let race = date(2025, 3, 31);
        assert_eq!(weeks_to_race(race, race).unwrap(), 0);
        assert_eq!(classify(0), Phase::Taper);
        assert!(is_race_week(0));
        assert_eq!(weeks_to_race(date(2025, 3, 24), race).unwrap(), 1);
        assert!(weeks_to_race(date(2025, 4, 1), race).is_err());
    }

    #[test]
    fn test_race_not_after_start_fails() {
        let start = date(2025, 1, 6);
        assert!(matches!(
            weeks_remaining(start, start),
            Err(ConfigError::RaceNotAfterStart { .. })
        ));
        assert!(determine_phase(start, date(2024, 12, 31)).is_err());
    }

    #[test]
    fn test_phase_thresholds() {
        assert_eq!(classify(20), Phase::Base);
        assert_eq!(classify(13), Phase::Base);
        assert_eq!(classify(12), Phase::Build);
        assert_eq!(classify(7), Phase::Build);
        assert_eq!(classify(6), Phase::Peak);
        assert_eq!(classify(4), Phase::Peak);
        assert_eq!(classify(3), Phase::Taper);
        assert_eq!(classify(1), Phase::Taper);
    }

    #[test]
    fn test_race_week_is_taper() {
        let start = date(2025, 3, 24);
        assert_eq!(determine_phase(start, date(2025, 3, 31)).unwrap(), Phase::Taper);
        assert!(is_race_week(1));
        assert!(!is_race_week(2));
    }

    proptest! {
        #[test]
        fn test_phase_never_regresses(weeks in 1u32..40u32) {
            prop_assert!(classify(weeks - 1) >= classify(weeks));
        }
    }
}
