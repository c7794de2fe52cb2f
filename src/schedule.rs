//! Day assembler
//!
//! Lays the week out in two steps. [`layout_week`] decides which weekday
//! hosts the long run, each quality session, the easy runs and the rest days.
//! [`assemble_days`] then turns that layout into dated sessions once the
//! planned weekly distance is known, splitting the easy distance so the day
//! total matches the weekly total exactly.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

use crate::models::{DaySession, GoalTier, PaceRange, Phase, SessionType};
use crate::notes::Advisory;
use crate::pace::PaceBands;
use crate::quality::QualitySession;
use crate::rules::{
    mp_finish_fraction, DISTANCE_DP, LONG_RUN_WEEKDAY, MARATHON_KM, MAX_CONSECUTIVE_RUN_DAYS,
    MAX_RUN_DAYS, QUALITY_WEEKDAYS, RACE_WEEK_MAX_RUN_DAYS,
};

pub const DAYS_PER_WEEK: usize = 7;

/// What a weekday is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Rest,
    Easy,
    Long,
    /// Index into the week's quality session list
    Quality(usize),
    Race,
    PostRace,
}

impl Slot {
    pub fn is_running(&self) -> bool {
        matches!(self, Slot::Easy | Slot::Long | Slot::Quality(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekLayout {
    pub dates: [NaiveDate; DAYS_PER_WEEK],
    pub slots: [Slot; DAYS_PER_WEEK],
    /// Quality sessions that found a weekday
    pub quality_placed: usize,
    pub advisories: Vec<Advisory>,
}

impl WeekLayout {
    pub fn easy_days(&self) -> usize {
        self.slots.iter().filter(|s| **s == Slot::Easy).count()
    }

    pub fn running_days(&self) -> usize {
        self.slots.iter().filter(|s| s.is_running()).count()
    }

    pub fn has_long_run(&self) -> bool {
        self.slots.contains(&Slot::Long)
    }

    pub fn longest_streak(&self) -> usize {
        longest_streak(self.slots.map(|s| s.is_running()))
    }
}

/// Seven consecutive dates starting at `start_date`
pub fn week_dates(start_date: NaiveDate) -> [NaiveDate; DAYS_PER_WEEK] {
    std::array::from_fn(|i| start_date + Duration::days(i as i64))
}

/// Decide the role of each day in the week
pub fn layout_week(
    start_date: NaiveDate,
    race_date: NaiveDate,
    frequency: u8,
    quality_requested: usize,
    race_week: bool,
) -> WeekLayout {
    let dates = week_dates(start_date);
    let mut slots = [Slot::Rest; DAYS_PER_WEEK];
    let mut advisories = Vec::new();

    for (slot, date) in slots.iter_mut().zip(dates.iter()) {
        if *date == race_date {
            *slot = Slot::Race;
        } else if *date > race_date {
            *slot = Slot::PostRace;
        }
    }
    let available: Vec<usize> = (0..DAYS_PER_WEEK).filter(|&i| slots[i] == Slot::Rest).collect();

    let cap = if race_week {
        RACE_WEEK_MAX_RUN_DAYS
    } else {
        MAX_RUN_DAYS
    };
    let run_days = usize::from(frequency.min(cap)).min(available.len());
    if run_days == 0 {
        return WeekLayout {
            dates,
            slots,
            quality_placed: 0,
            advisories,
        };
    }

    // A lone race-week run is the easy day furthest from the race
    if race_week && run_days == 1 {
        slots[available[0]] = Slot::Easy;
        if quality_requested > 0 {
            advisories.push(Advisory::QualityReduced {
                requested: quality_requested,
                placed: 0,
            });
        }
        debug!("Week layout from {}: {:?}", start_date, slots);
        return WeekLayout {
            dates,
            slots,
            quality_placed: 0,
            advisories,
        };
    }

    let long_index = available
        .iter()
        .copied()
        .find(|&i| dates[i].weekday() == LONG_RUN_WEEKDAY)
        .or_else(|| available.last().copied())
        .unwrap_or(0);
    slots[long_index] = Slot::Long;

    let quality_limit = quality_requested.min(run_days - 1);
    let mut quality_days: Vec<usize> = Vec::new();
    for candidate in quality_candidates(&dates, &available) {
        if quality_days.len() >= quality_limit {
            break;
        }
        let adjacent = |other: usize| candidate.abs_diff(other) <= 1;
        if candidate == long_index
            || adjacent(long_index)
            || quality_days.iter().any(|&q| adjacent(q))
        {
            continue;
        }
        quality_days.push(candidate);
    }
    for (order, &day) in quality_days.iter().enumerate() {
        slots[day] = Slot::Quality(order);
    }
    if quality_days.len() < quality_requested {
        warn!(
            "Only {} of {} quality sessions fit {} running days",
            quality_days.len(),
            quality_requested,
            run_days
        );
        advisories.push(Advisory::QualityReduced {
            requested: quality_requested,
            placed: quality_days.len(),
        });
    }

    let free: Vec<usize> = available
        .iter()
        .copied()
        .filter(|&i| slots[i] == Slot::Rest)
        .collect();
    let easy_count = run_days - 1 - quality_days.len();
    for day in choose_easy_days(&dates, &slots, &free, easy_count, long_index) {
        slots[day] = Slot::Easy;
    }

    let mut layout = WeekLayout {
        dates,
        slots,
        quality_placed: quality_days.len(),
        advisories,
    };
    let streak = layout.longest_streak();
    if streak > MAX_CONSECUTIVE_RUN_DAYS {
        warn!("{} consecutive running days in week of {}", streak, start_date);
        layout.advisories.push(Advisory::StreakExceeded(streak));
    }
    debug!("Week layout from {}: {:?}", start_date, layout.slots);
    layout
}

/// Preferred quality weekdays first, then every other available day in order
fn quality_candidates(dates: &[NaiveDate; DAYS_PER_WEEK], available: &[usize]) -> Vec<usize> {
    let mut ordered: Vec<usize> = QUALITY_WEEKDAYS
        .iter()
        .filter_map(|weekday| {
            available
                .iter()
                .copied()
                .find(|&i| dates[i].weekday() == *weekday)
        })
        .collect();
    for &i in available {
        if !ordered.contains(&i) {
            ordered.push(i);
        }
    }
    ordered
}

/// Pick which free days run easy.
///
/// Minimises the longest running streak, then prefers rest on the day after
/// the long run (or its usual weekday) and after quality days.
fn choose_easy_days(
    dates: &[NaiveDate; DAYS_PER_WEEK],
    slots: &[Slot; DAYS_PER_WEEK],
    free: &[usize],
    easy_count: usize,
    long_index: usize,
) -> Vec<usize> {
    if easy_count == 0 {
        return Vec::new();
    }
    if easy_count >= free.len() {
        return free.to_vec();
    }

    let after_long_weekday: Weekday = LONG_RUN_WEEKDAY.succ();
    let mut best: Option<(usize, i32, Vec<usize>)> = None;

    for mask in 0u32..(1 << free.len()) {
        if mask.count_ones() as usize != easy_count {
            continue;
        }
        let easy: Vec<usize> = free
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, &day)| day)
            .collect();

        let running: [bool; DAYS_PER_WEEK] =
            std::array::from_fn(|i| slots[i].is_running() || easy.contains(&i));
        let streak = longest_streak(running);

        let score: i32 = free
            .iter()
            .filter(|&&day| !easy.contains(&day))
            .map(|&day| {
                if day == long_index + 1 || dates[day].weekday() == after_long_weekday {
                    2
                } else if day > 0 && matches!(slots[day - 1], Slot::Quality(_)) {
                    1
                } else {
                    0
                }
            })
            .sum();

        let better = match &best {
            None => true,
            Some((best_streak, best_score, _)) => {
                streak < *best_streak || (streak == *best_streak && score > *best_score)
            }
        };
        if better {
            best = Some((streak, score, easy));
        }
    }

    best.map(|(_, _, easy)| easy).unwrap_or_default()
}

fn longest_streak(running: [bool; DAYS_PER_WEEK]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for day in running {
        if day {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Long-run details needed to write the session
#[derive(Debug, Clone, Copy)]
pub struct LongRunSlot {
    pub distance_km: Decimal,
    pub stage: u8,
}

/// Turn a layout into dated sessions.
///
/// Easy days share `planned_km` minus the long run and placed quality work,
/// truncated to 0.1 km; the first easy day absorbs the remainder.
#[allow(clippy::too_many_arguments)]
pub fn assemble_days(
    layout: &WeekLayout,
    planned_km: Decimal,
    long_run: LongRunSlot,
    quality: &[QualitySession],
    bands: &PaceBands,
    phase: Phase,
    tier: GoalTier,
    race_week: bool,
) -> Vec<DaySession> {
    let quality_km: Decimal = layout
        .slots
        .iter()
        .filter_map(|slot| match slot {
            Slot::Quality(i) => quality.get(*i).map(|q| q.distance_km),
            _ => None,
        })
        .sum();

    let long_km = if layout.has_long_run() {
        long_run.distance_km
    } else {
        Decimal::ZERO
    };
    let easy_days = layout.easy_days();
    let easy_shares = split_easy_distance(planned_km - long_km - quality_km, easy_days);
    let mut easy_iter = easy_shares.into_iter();
    let mut strides_pending = race_week;

    layout
        .slots
        .iter()
        .zip(layout.dates.iter())
        .map(|(slot, &date)| match slot {
            Slot::Rest => DaySession::rest(date, "Rest / mobility", "Recovery"),
            Slot::Race => DaySession::rest(
                date,
                &format!("Race day: {} km marathon", MARATHON_KM),
                "Race",
            ),
            Slot::PostRace => DaySession::rest(date, "Post-race recovery", "Recovery"),
            Slot::Long => long_run_session(date, long_run, bands, tier, race_week),
            Slot::Quality(i) => match quality.get(*i) {
                Some(session) => running_session(
                    date,
                    session.session_type,
                    session.distance_km,
                    bands.for_quality(phase, session.session_type),
                    session.structure.clone(),
                    session.purpose.clone(),
                ),
                None => DaySession::rest(date, "Rest / mobility", "Recovery"),
            },
            Slot::Easy => {
                let distance = easy_iter.next().unwrap_or(Decimal::ZERO);
                let (structure, note) = if strides_pending {
                    strides_pending = false;
                    (
                        format!("{} km easy incl. 3 x 80 m strides", distance),
                        "Race week rhythm".to_string(),
                    )
                } else {
                    (format!("Easy jog {} km", distance), "Aerobic maintenance".to_string())
                };
                let pace_range = Some(bands.easy);
                running_session(date, SessionType::Easy, distance, pace_range, structure, note)
            }
        })
        .collect()
}

/// Even split truncated to 0.1 km, remainder on the first share
pub fn split_easy_distance(total_km: Decimal, days: usize) -> Vec<Decimal> {
    if days == 0 {
        return Vec::new();
    }
    let total_km = total_km.max(Decimal::ZERO);
    let each = (total_km / Decimal::from(days as u64))
        .round_dp_with_strategy(DISTANCE_DP, RoundingStrategy::ToZero);
    let remainder = total_km - each * Decimal::from(days as u64);

    let mut shares = vec![each; days];
    shares[0] += remainder;
    shares
}

fn long_run_session(
    date: NaiveDate,
    long_run: LongRunSlot,
    bands: &PaceBands,
    tier: GoalTier,
    race_week: bool,
) -> DaySession {
    let distance = long_run.distance_km;
    let (structure, note) = if race_week {
        (
            format!("Relaxed shakeout {} km", distance),
            "Short, confidence-building run".to_string(),
        )
    } else {
        let fraction = mp_finish_fraction(tier, long_run.stage);
        let mp_km = (distance * fraction).round_dp(DISTANCE_DP);
        let structure = if mp_km > Decimal::ZERO {
            format!("{} km easy + {} km MP finish", distance - mp_km, mp_km)
        } else {
            format!("Continuous long run {} km", distance)
        };
        (structure, format!("Stage {} long run", long_run.stage))
    };
    let pace_range = Some(bands.long(long_run.stage));
    running_session(date, SessionType::Long, distance, pace_range, structure, note)
}

fn running_session(
    date: NaiveDate,
    session_type: SessionType,
    distance_km: Decimal,
    pace_range: Option<PaceRange>,
    structure: String,
    note: String,
) -> DaySession {
    DaySession {
        date,
        weekday: date.weekday().to_string(),
        session_type,
        distance_km,
        pace_range,
        structure,
        note,
    }
}
