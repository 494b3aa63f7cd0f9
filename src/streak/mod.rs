//! Runs of consecutive days on which both goals were met.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, TimeZone};
use serde::Serialize;

use crate::models::{DailyGoalStatus, Goals, ScreenTimeRecord, WakeRecord};
use crate::utils::DayCalendar;

/// Per-day lookup tables for both metrics. Wake values are minutes after
/// local midnight; skipped screen-time days have no entry.
#[derive(Debug, Clone, Default)]
pub struct GoalLookup {
    wake: HashMap<NaiveDate, f64>,
    screen: HashMap<NaiveDate, i32>,
}

impl GoalLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<Tz: TimeZone>(
        wake_records: &[WakeRecord],
        screen_records: &[ScreenTimeRecord],
        calendar: &DayCalendar<Tz>,
    ) -> Self {
        let mut lookup = Self::new();
        for record in wake_records {
            if let Some(wake) = record.wake_time {
                lookup.insert_wake(record.day, calendar.minutes_from_midnight(wake));
            }
        }
        for record in screen_records {
            lookup.insert_screen(*record);
        }
        lookup
    }

    pub fn insert_wake(&mut self, day: NaiveDate, minutes_from_midnight: f64) {
        self.wake.insert(day, minutes_from_midnight);
    }

    /// A skipped record clears any value previously stored for its day.
    pub fn insert_screen(&mut self, record: ScreenTimeRecord) {
        match record.valid_minutes() {
            Some(minutes) => {
                self.screen.insert(record.day, minutes);
            }
            None => {
                self.screen.remove(&record.day);
            }
        }
    }

    pub fn status(&self, day: NaiveDate) -> DailyGoalStatus {
        DailyGoalStatus {
            day,
            wake_minutes_from_midnight: self.wake.get(&day).copied(),
            screen_minutes: self.screen.get(&day).copied(),
        }
    }

    pub fn met_goals(&self, day: NaiveDate, goals: &Goals) -> bool {
        self.status(day).meets(goals)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub current: u32,
    pub best_this_year: u32,
}

/// Consecutive successful days counting back from yesterday. Today is still
/// in progress and never counts.
pub fn current_streak(lookup: &GoalLookup, goals: &Goals, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today.pred_opt();

    while let Some(current) = day {
        if !lookup.met_goals(current, goals) {
            break;
        }
        streak += 1;
        day = current.pred_opt();
    }

    streak
}

/// Longest run within `year`, scanning January 1 through `through`
/// (clamped to December 31 of that year).
pub fn best_streak_in_year(
    lookup: &GoalLookup,
    goals: &Goals,
    year: i32,
    through: NaiveDate,
) -> u32 {
    let (Some(first), Some(last)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return 0;
    };
    let end = through.min(last);

    let mut best = 0;
    let mut current = 0;
    for day in first.iter_days().take_while(|day| *day <= end) {
        if lookup.met_goals(day, goals) {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

pub fn best_streak_this_year(lookup: &GoalLookup, goals: &Goals, today: NaiveDate) -> u32 {
    best_streak_in_year(lookup, goals, today.year(), today)
}

pub fn summarize(lookup: &GoalLookup, goals: &Goals, today: NaiveDate) -> StreakSummary {
    StreakSummary {
        current: current_streak(lookup, goals, today),
        best_this_year: best_streak_this_year(lookup, goals, today),
    }
}
