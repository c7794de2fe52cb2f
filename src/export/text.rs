use colored::*;
use std::fmt::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{MultiWeekPlan, Phase, WeekPlan};

#[derive(Tabled)]
struct DayLine {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Day")]
    weekday: String,
    #[tabled(rename = "Session")]
    session: String,
    #[tabled(rename = "km")]
    distance: String,
    #[tabled(rename = "Pace")]
    pace: String,
    #[tabled(rename = "Structure")]
    structure: String,
}

#[derive(Tabled)]
struct WeekLine {
    #[tabled(rename = "Week")]
    week: usize,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Phase")]
    phase: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Planned")]
    planned: String,
    #[tabled(rename = "Actual")]
    actual: String,
    #[tabled(rename = "Long run")]
    long_run: String,
    #[tabled(rename = "Quality")]
    quality: usize,
}

fn phase_heading(phase: Phase) -> ColoredString {
    match phase {
        Phase::Base => phase.label().green(),
        Phase::Build => phase.label().yellow(),
        Phase::Peak => phase.label().red(),
        Phase::Taper => phase.label().cyan(),
    }
    .bold()
}

/// Summary header, day table and notes for one week
pub fn render_week(week: &WeekPlan) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {} to {}  {}  {}",
        format!("Week {}", week.index + 1).as_str().bold(),
        week.start_date,
        week.end_date,
        phase_heading(week.phase),
        week.goal_tier.label().bold()
    );
    let _ = writeln!(
        out,
        "{} weeks to race | target {} km | planned {} km | long run {} km (stage {}) | {} quality",
        week.weeks_to_race,
        week.target_weekly_km,
        week.planned_weekly_km,
        week.long_run_km,
        week.long_run_stage,
        week.quality_sessions
    );
    if let Some(actual) = week.actual {
        let _ = writeln!(out, "{} {} km", "Actual:".bold(), actual.weekly_km);
    }

    let rows: Vec<DayLine> = week
        .days
        .iter()
        .map(|day| DayLine {
            date: day.date.format("%m-%d").to_string(),
            weekday: day.weekday.clone(),
            session: day.session_type.label().to_string(),
            distance: if day.session_type.is_running() {
                day.distance_km.to_string()
            } else {
                "-".to_string()
            },
            pace: day
                .pace_range
                .map_or("-".to_string(), |r| r.to_string()),
            structure: day.structure.clone(),
        })
        .collect();
    let _ = writeln!(out, "{}", Table::new(rows).with(Style::rounded()));

    if !week.notes.is_empty() {
        let _ = writeln!(out, "{}", "Notes".bold().underline());
        for note in &week.notes {
            let _ = writeln!(out, "  • {}", note);
        }
    }
    out
}

/// Cycle overview followed by every week in detail
pub fn render_cycle(plan: &MultiWeekPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} to race day {} ({} weeks, {} km planned)",
        "Training cycle".bold().cyan(),
        plan.start_date,
        plan.race_date,
        plan.weeks.len(),
        plan.total_planned_km()
    );

    let rows: Vec<WeekLine> = plan
        .weeks
        .iter()
        .map(|week| WeekLine {
            week: week.index + 1,
            start: week.start_date.to_string(),
            phase: week.phase.label().to_string(),
            target: week.target_weekly_km.to_string(),
            planned: week.planned_weekly_km.to_string(),
            actual: week
                .actual
                .map_or("-".to_string(), |a| a.weekly_km.to_string()),
            long_run: format!("{} (S{})", week.long_run_km, week.long_run_stage),
            quality: week.quality_sessions,
        })
        .collect();
    let _ = writeln!(out, "{}", Table::new(rows).with(Style::rounded()));

    for week in &plan.weeks {
        let _ = writeln!(out);
        out.push_str(&render_week(week));
    }
    out
}
