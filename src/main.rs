use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{error, info, warn};

use paceplan::config::AppConfig;
use paceplan::error::ErrorSeverity;
use paceplan::export::{self, json::to_json, ExportFormat};
use paceplan::logging::{init_logging, LogConfig};
use paceplan::normalize::{parse_date, parse_override};
use paceplan::{
    generate_multi_week_plan, generate_week_plan, plan_roster, recompute_multi_week_plan,
    ActualMileage, BatchConfig, HistoryOverrides, PlanConfig, PlannerError, RunnerInput,
};

/// paceplan - Marathon Training Planner
///
/// Builds weekly marathon training plans from recent mileage, a goal time
/// and the race date, and replays the cycle when actual mileage comes in.
#[derive(Parser)]
#[command(name = "paceplan")]
#[command(version)]
#[command(about = "Marathon training planner", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format (table, json, csv)
    #[arg(short, long, global = true)]
    format: Option<ExportFormat>,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Runner parameters; each flag overrides the `[runner]` section of the config file
#[derive(Args, Debug, Default)]
struct RunnerArgs {
    /// Race date (YYYY-MM-DD)
    #[arg(long)]
    race_date: Option<String>,

    /// Average weekly distance over recent weeks, km
    #[arg(long, value_name = "KM")]
    weekly_km: Option<f64>,

    /// Most recent long run, km
    #[arg(long, value_name = "KM")]
    long_km: Option<f64>,

    /// Goal finish time (HH:MM or HH:MM:SS)
    #[arg(long, value_name = "TIME")]
    goal_time: Option<String>,

    /// Current marathon pace (M:SS per km)
    #[arg(long, value_name = "PACE")]
    current_mp: Option<String>,

    /// Recovering from injury or illness
    #[arg(long)]
    injury: bool,

    /// Weekly elevation gain, metres
    #[arg(long, value_name = "M")]
    elevation: Option<f64>,

    /// Perceived fatigue, 1-10
    #[arg(long, value_name = "SCORE")]
    fatigue: Option<u8>,

    /// Running days per week (1-7)
    #[arg(long, value_name = "DAYS")]
    frequency: Option<u8>,

    /// First day of the plan (YYYY-MM-DD), defaults to today
    #[arg(long)]
    start: Option<String>,
}

impl RunnerArgs {
    /// Merge flags over the saved runner profile
    fn merge(&self, saved: Option<&RunnerInput>) -> Result<RunnerInput> {
        let mut input = saved.cloned().unwrap_or_default();
        if let Some(race_date) = &self.race_date {
            input.race_date = race_date.clone();
        }
        if let Some(km) = self.weekly_km {
            input.recent_weekly_km = km;
        }
        if let Some(km) = self.long_km {
            input.recent_long_km = km;
        }
        if let Some(time) = &self.goal_time {
            input.goal_marathon_time = time.clone();
        }
        if let Some(pace) = &self.current_mp {
            input.current_mp = pace.clone();
        }
        if self.injury {
            input.injury_flag = true;
        }
        if self.elevation.is_some() {
            input.weekly_elevation_gain_m = self.elevation;
        }
        if self.fatigue.is_some() {
            input.fatigue_score = self.fatigue;
        }
        if self.frequency.is_some() {
            input.weekly_frequency = self.frequency;
        }

        for (value, flag) in [
            (&input.race_date, "--race-date"),
            (&input.goal_marathon_time, "--goal-time"),
            (&input.current_mp, "--current-mp"),
        ] {
            if value.trim().is_empty() {
                bail!("Missing {} (pass the flag or set it under [runner] in the config file)", flag);
            }
        }
        Ok(input)
    }

    fn plan_config(&self, saved: Option<&RunnerInput>) -> Result<PlanConfig> {
        let input = self.merge(saved)?;
        Ok(input.normalize().map_err(PlannerError::from)?)
    }

    fn start_date(&self) -> Result<Option<chrono::NaiveDate>> {
        match &self.start {
            Some(start) => Ok(Some(parse_date("start", start).map_err(PlannerError::from)?)),
            None => Ok(None),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a single week
    Week {
        #[command(flatten)]
        runner: RunnerArgs,
    },

    /// Plan every week up to race day
    Cycle {
        #[command(flatten)]
        runner: RunnerArgs,
    },

    /// Replay the cycle with actual weekly mileage
    Recompute {
        #[command(flatten)]
        runner: RunnerArgs,

        /// Actual mileage for a week, e.g. 2=48 or 2=48/20 (repeatable)
        #[arg(long = "actual", value_name = "IDX=KM[/LONG]", value_parser = parse_override)]
        actual: Vec<(usize, ActualMileage)>,
    },

    /// Plan cycles for every runner in a CSV roster
    Batch {
        /// Roster CSV file
        #[arg(short, long)]
        roster: PathBuf,

        /// Number of worker threads
        #[arg(short, long)]
        threads: Option<usize>,

        /// Start date for rows without one (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
    },

    /// Manage the configuration file
    Config {
        /// Write a sample configuration file
        #[arg(long)]
        init: bool,

        /// Print the effective configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Tabled)]
struct RunnerLine {
    #[tabled(rename = "Runner")]
    name: String,
    #[tabled(rename = "Weeks")]
    weeks: String,
    #[tabled(rename = "Planned km")]
    planned: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "ms")]
    duration_ms: u128,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        match err.downcast_ref::<PlannerError>() {
            Some(planner_err) => {
                match planner_err.severity() {
                    ErrorSeverity::Warning => warn!("{}", planner_err),
                    ErrorSeverity::Error => error!("{}", planner_err),
                }
                eprintln!("{} {}", "Error:".red().bold(), planner_err.user_message())
            }
            None => eprintln!("{} {:#}", "Error:".red().bold(), err),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let app = AppConfig::load_or_default(cli.config.as_deref())?;

    let log_config = LogConfig {
        level: app.logging.level.raised_by(cli.verbose),
        ..app.logging.clone()
    };
    init_logging(&log_config)?;

    if !app.output.color || cli.output.is_some() {
        colored::control::set_override(false);
    }

    let format = cli
        .format
        .or_else(|| cli.output.as_deref().and_then(ExportFormat::from_path))
        .unwrap_or(app.output.format);
    let output = cli.output.as_deref();

    match cli.command {
        Commands::Week { runner } => {
            let config = runner.plan_config(app.runner.as_ref())?;
            let week =
                generate_week_plan(&config, runner.start_date()?).map_err(PlannerError::from)?;
            export::write_output(&export::render_week(&week, format)?, output)?;
        }

        Commands::Cycle { runner } => {
            let config = runner.plan_config(app.runner.as_ref())?;
            let plan = generate_multi_week_plan(&config, runner.start_date()?)
                .map_err(PlannerError::from)?;
            export::write_output(&export::render_cycle(&plan, format)?, output)?;
        }

        Commands::Recompute { runner, actual } => {
            let config = runner.plan_config(app.runner.as_ref())?;
            let overrides: HistoryOverrides = actual.into_iter().collect();
            info!("Recomputing with {} actual-mileage overrides", overrides.len());
            let plan = recompute_multi_week_plan(&config, &overrides, runner.start_date()?)
                .map_err(PlannerError::from)?;
            export::write_output(&export::render_cycle(&plan, format)?, output)?;
        }

        Commands::Batch {
            roster,
            threads,
            start,
        } => {
            let default_start = match start {
                Some(start) => Some(parse_date("start", &start).map_err(PlannerError::from)?),
                None => None,
            };
            let rows = paceplan::roster::load_roster(&roster)
                .with_context(|| format!("Failed to load roster {}", roster.display()))?;
            let summary = plan_roster(
                &rows,
                &BatchConfig {
                    num_threads: threads,
                    default_start,
                },
            )?;

            let lines: Vec<RunnerLine> = summary
                .results
                .iter()
                .map(|r| RunnerLine {
                    name: r.name.clone(),
                    weeks: r
                        .plan
                        .as_ref()
                        .map_or("-".to_string(), |p| p.weeks.len().to_string()),
                    planned: r
                        .plan
                        .as_ref()
                        .map_or("-".to_string(), |p| p.total_planned_km().to_string()),
                    status: match &r.error {
                        Some(e) => e.to_string(),
                        None => "ok".to_string(),
                    },
                    duration_ms: r.duration_ms,
                })
                .collect();
            println!("{}", Table::new(lines).with(Style::rounded()));
            println!("{}", summary.to_string_pretty());
            for (name, error) in summary.errors() {
                warn!("{}: {}", name, error);
            }

            if let Some(dir) = output {
                for result in &summary.results {
                    if let Some(plan) = &result.plan {
                        let path = runner_output_path(dir, &result.name, format);
                        export::write_output(&export::render_cycle(plan, format)?, Some(&path))?;
                    }
                }
                println!("{} {}", "Plans written to".green(), dir.display());
            }
        }

        Commands::Config { init, show } => {
            let path = cli.config.clone().unwrap_or_else(AppConfig::default_config_path);
            if init {
                if path.exists() {
                    bail!("Config file already exists: {}", path.display());
                }
                AppConfig::sample().save_to_file(&path)?;
                println!("{} {}", "✓ Wrote sample configuration to".green(), path.display());
            }
            if show || !init {
                println!("{}", format!("# {}", path.display()).dimmed());
                match format {
                    ExportFormat::Json => println!("{}", to_json(&app)?),
                    _ => println!("{}", toml::to_string_pretty(&app)?),
                }
            }
        }
    }

    Ok(())
}

/// `<dir>/<runner>.<ext>` with the runner name made file-safe
fn runner_output_path(dir: &Path, name: &str, format: ExportFormat) -> PathBuf {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let extension = match format {
        ExportFormat::Table => "txt",
        ExportFormat::Json => "json",
        ExportFormat::Csv => "csv",
    };
    dir.join(stem).with_extension(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_recompute() {
        let cli = Cli::try_parse_from([
            "paceplan",
            "recompute",
            "--race-date",
            "2025-03-31",
            "--actual",
            "2=40",
            "--actual",
            "3=45/20",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.format, Some(ExportFormat::Json));
        match cli.command {
            Commands::Recompute { actual, .. } => {
                assert_eq!(actual.len(), 2);
                assert_eq!(actual[1].0, 3);
                assert!(actual[1].1.long_run_km.is_some());
            }
            _ => panic!("expected recompute"),
        }
    }

    #[test]
    fn test_bad_override_rejected() {
        assert!(Cli::try_parse_from(["paceplan", "recompute", "--actual", "x=40"]).is_err());
    }

    #[test]
    fn test_flags_override_saved_runner() {
        let saved = AppConfig::sample().runner;
        let args = RunnerArgs {
            weekly_km: Some(40.0),
            injury: true,
            ..Default::default()
        };
        let input = args.merge(saved.as_ref()).unwrap();
        assert_eq!(input.recent_weekly_km, 40.0);
        assert!(input.injury_flag);
        assert_eq!(input.race_date, "2025-03-31");
    }

    #[test]
    fn test_missing_fields_reported() {
        let err = RunnerArgs::default().merge(None).unwrap_err();
        assert!(err.to_string().contains("--race-date"));
    }

    #[test]
    fn test_runner_output_path() {
        let path = runner_output_path(Path::new("out"), "Ana María", ExportFormat::Csv);
        assert_eq!(path, PathBuf::from("out/Ana_Mar_a.csv"));
    }
}
