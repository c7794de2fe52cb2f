use chrono::NaiveDate;
use paceplan::long_run::baseline_stage;
use paceplan::rules::{MIN_WEEKLY_KM, RACE_WEEK_LONG_RUN_KM};
use paceplan::{generate_week_plan, GoalTier, Phase, PlanConfig, RunnerInput, SessionType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// End-to-end planning scenarios, driven from raw runner input

#[cfg(test)]
mod planner_scenarios {
    use super::*;

    fn runner() -> RunnerInput {
        RunnerInput {
            race_date: "2025-03-31".to_string(),
            recent_weekly_km: 60.0,
            recent_long_km: 24.0,
            goal_marathon_time: "03:30:00".to_string(),
            current_mp: "05:10".to_string(),
            ..Default::default()
        }
    }

    fn config(input: &RunnerInput) -> PlanConfig {
        input.normalize().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_build_week_from_runner_input() {
        let week = generate_week_plan(&config(&runner()), date(2025, 1, 6)).unwrap();

        assert_eq!(week.phase, Phase::Build);
        assert_eq!(week.goal_tier, GoalTier::G2);
        assert_eq!(week.quality_sessions, 1);
        assert!(week.long_run_stage > baseline_stage(dec!(24)));
        assert!(week.planned_weekly_km >= dec!(60));
        assert_eq!(week.sessions_of(SessionType::Long).count(), 1);
        assert_eq!(week.days.first().unwrap().weekday, "Mon");
    }

    #[test]
    fn test_injury_limits_growth() {
        let mut healthy = runner();
        healthy.recent_weekly_km = 40.0;
        let mut injured = healthy.clone();
        injured.injury_flag = true;

        let healthy_week = generate_week_plan(&config(&healthy), date(2025, 1, 6)).unwrap();
        let injured_week = generate_week_plan(&config(&injured), date(2025, 1, 6)).unwrap();

        assert!(injured_week.target_weekly_km < healthy_week.target_weekly_km);
        assert!(injured_week.target_weekly_km > dec!(40));
        assert!(injured_week.notes.iter().any(|n| n.contains("Injury")));
        assert!(!healthy_week.notes.iter().any(|n| n.contains("Injury")));
    }

    #[test]
    fn test_one_week_out_is_race_week() {
        let week = generate_week_plan(&config(&runner()), date(2025, 3, 24)).unwrap();

        assert_eq!(week.phase, Phase::Taper);
        assert!(week.is_race_week());
        assert_eq!(week.quality_sessions, 0);
        assert_eq!(week.long_run_km, RACE_WEEK_LONG_RUN_KM);
        assert!(week.days.iter().all(|d| !d.session_type.is_quality()));
        assert!(week.days.iter().any(|d| d.structure.contains("strides")));
    }

    #[test]
    fn test_race_day_inside_final_week() {
        let mut input = runner();
        input.race_date = "2025-03-30".to_string();
        let week = generate_week_plan(&config(&input), date(2025, 3, 24)).unwrap();

        let race_day = week.days.last().unwrap();
        assert_eq!(race_day.session_type, SessionType::Rest);
        assert_eq!(race_day.distance_km, Decimal::ZERO);
        assert!(race_day.structure.starts_with("Race day"));
        assert_eq!(week.total_distance(), week.planned_weekly_km);
    }

    #[test]
    fn test_race_right_after_start_keeps_weekly_floor() {
        for race_date in ["2025-03-25", "2025-03-26"] {
            let mut input = runner();
            input.race_date = race_date.to_string();
            let week = generate_week_plan(&config(&input), date(2025, 3, 24)).unwrap();

            assert!(week.planned_weekly_km >= MIN_WEEKLY_KM);
            assert_eq!(week.total_distance(), week.planned_weekly_km);
            assert!(week.days.iter().any(|d| d.structure.starts_with("Race day")));
            assert!(week.sessions_of(SessionType::Easy).count() >= 1);
        }
    }

    #[test]
    fn test_week_plan_is_idempotent() {
        let config = config(&runner());
        let first = generate_week_plan(&config, date(2025, 1, 6)).unwrap();
        let second = generate_week_plan(&config, date(2025, 1, 6)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_day_distances_sum_to_planned_across_phases() {
        let config = config(&runner());
        for start in [
            date(2024, 11, 4),
            date(2025, 1, 6),
            date(2025, 2, 24),
            date(2025, 3, 10),
            date(2025, 3, 24),
        ] {
            let week = generate_week_plan(&config, start).unwrap();
            let diff = (week.total_distance() - week.planned_weekly_km).abs();
            assert!(diff <= dec!(0.05), "{:?}: {} vs {}", start, week.total_distance(), week.planned_weekly_km);
            assert_eq!(week.days.len(), 7);
        }
    }

    #[test]
    fn test_paces_ordered_fastest_to_slowest() {
        let week = generate_week_plan(&config(&runner()), date(2025, 1, 6)).unwrap();
        for day in &week.days {
            match day.pace_range {
                Some(range) => assert!(range.fast <= range.slow),
                None => assert_eq!(day.session_type, SessionType::Rest),
            }
        }
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let mut input = runner();
        input.goal_marathon_time = "three hours".to_string();
        assert!(input.normalize().is_err());

        let mut input = runner();
        input.fatigue_score = Some(11);
        assert!(input.normalize().is_err());

        assert!(generate_week_plan(&config(&runner()), date(2025, 3, 31)).is_err());
    }
}
