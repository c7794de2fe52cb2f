use chrono::NaiveDate;
use paceplan::config::AppConfig;
use paceplan::export::{self, ExportFormat};
use paceplan::roster::{plan_roster, read_roster, BatchConfig};
use paceplan::{generate_multi_week_plan, MultiWeekPlan, PlanConfig, RunnerInput};
use rust_decimal::Decimal;
use tempfile::tempdir;

/// Export, config file and roster workflows through the public API

#[cfg(test)]
mod export_tests {
    use super::*;

    fn input() -> RunnerInput {
        RunnerInput {
            race_date: "2025-02-23".to_string(),
            recent_weekly_km: 48.0,
            recent_long_km: 21.0,
            goal_marathon_time: "03:50".to_string(),
            current_mp: "5:35".to_string(),
            weekly_elevation_gain_m: Some(950.0),
            ..Default::default()
        }
    }

    fn config() -> PlanConfig {
        input().normalize().unwrap()
    }

    fn plan() -> MultiWeekPlan {
        generate_multi_week_plan(&config(), NaiveDate::from_ymd_opt(2025, 1, 6)).unwrap()
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cycle.json");
        let plan = plan();

        let format = ExportFormat::from_path(&path).unwrap();
        export::write_output(&export::render_cycle(&plan, format).unwrap(), Some(&path)).unwrap();

        let reloaded: MultiWeekPlan =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded, plan);
    }

    #[test]
    fn test_csv_file_has_a_row_per_day() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cycle.csv");
        let plan = plan();

        export::write_output(&export::render_cycle(&plan, ExportFormat::Csv).unwrap(), Some(&path))
            .unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), plan.weeks.len() * 7);

        let total: Decimal = records.iter().map(|r| r[6].parse::<Decimal>().unwrap()).sum();
        assert_eq!(total, plan.total_planned_km());
    }

    #[test]
    fn test_table_output_contains_notes() {
        colored::control::set_override(false);
        let text = export::render_cycle(&plan(), ExportFormat::Table).unwrap();
        assert!(text.contains("Training cycle"));
        assert!(text.contains("elevation"));
        assert!(text.contains("Long Run"));
    }

    #[test]
    fn test_saved_runner_profile_plans_identically() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let app = AppConfig {
            runner: Some(input()),
            ..Default::default()
        };
        app.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(loaded, app);
        let config = loaded.runner.unwrap().normalize().unwrap();
        assert_eq!(config, self::config());
        assert_eq!(
            generate_multi_week_plan(&config, NaiveDate::from_ymd_opt(2025, 1, 6)).unwrap(),
            plan()
        );
    }

    #[test]
    fn test_roster_plans_match_single_runner_plans() {
        let roster = "\
name,race_date,recent_weekly_km,recent_long_km,goal_marathon_time,current_mp,injury_flag,weekly_elevation_gain_m,fatigue_score,weekly_frequency,start_date
Dee,2025-02-23,48,21,03:50,5:35,false,950,,,
Eli,2025-02-23,0,21,03:50,5:35,false,,,,
";
        let rows = read_roster(roster.as_bytes()).unwrap();
        let summary = plan_roster(
            &rows,
            &BatchConfig {
                num_threads: Some(2),
                default_start: NaiveDate::from_ymd_opt(2025, 1, 6),
            },
        )
        .unwrap();

        assert_eq!(summary.successful(), 1);
        assert_eq!(summary.results[0].plan.as_ref().unwrap(), &plan());
        assert!(summary.results[1].error.is_some());
    }
}
