// Library interface for the paceplan planning engine
// Integration tests and the CLI go through these modules

pub mod config;
pub mod error;
pub mod export;
pub mod goal_tier;
pub mod logging;
pub mod long_run;
pub mod models;
pub mod multi_week;
pub mod normalize;
pub mod notes;
pub mod pace;
pub mod phase;
pub mod planner;
pub mod quality;
pub mod roster;
pub mod rules;
pub mod schedule;
pub mod volume;

// Re-export commonly used types for convenience
pub use models::*;
pub use error::{ConfigError, ExportError, PlannerError, Result};
pub use export::ExportFormat;
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use multi_week::{generate_multi_week_plan, recompute_multi_week_plan};
pub use normalize::RunnerInput;
pub use planner::generate_week_plan;
pub use roster::{plan_roster, BatchConfig, BatchSummary, RosterRow};
