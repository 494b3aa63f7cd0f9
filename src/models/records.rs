//! Per-day records and the derived series the aggregation layers work on.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Goals;

/// Screen-time value meaning "day explicitly skipped".
pub const SKIPPED_MINUTES: i32 = -1;

pub const MAX_MINUTES_PER_DAY: i32 = 1440;

/// The resolved wake time for one calendar day. `wake_time` is `None` when
/// no asleep segment was found in that day's night window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WakeRecord {
    pub day: NaiveDate,
    pub wake_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScreenTimeRecord {
    pub day: NaiveDate,
    pub minutes: i32,
}

impl ScreenTimeRecord {
    pub fn new(day: NaiveDate, minutes: i32) -> Self {
        Self { day, minutes }
    }

    pub fn skipped(day: NaiveDate) -> Self {
        Self {
            day,
            minutes: SKIPPED_MINUTES,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.minutes == SKIPPED_MINUTES
    }

    /// The logged minutes, or `None` for skipped (or otherwise negative) days.
    pub fn valid_minutes(&self) -> Option<i32> {
        (self.minutes >= 0).then_some(self.minutes)
    }
}

/// Both metrics for one day, as seen by the streak engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyGoalStatus {
    pub day: NaiveDate,
    pub wake_minutes_from_midnight: Option<f64>,
    pub screen_minutes: Option<i32>,
}

impl DailyGoalStatus {
    /// A day counts only when both metrics are present and each is within goal.
    pub fn meets(&self, goals: &Goals) -> bool {
        match (self.wake_minutes_from_midnight, self.screen_minutes) {
            (Some(wake), Some(screen)) => {
                wake <= goals.goal_wake_minutes && screen <= goals.goal_screen_minutes
            }
            _ => false,
        }
    }
}

/// One data point of a per-day metric series (wake minutes or screen minutes).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyValue {
    pub day: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PeriodKind {
    Day,
    Week,
    Month,
    Year,
}

impl PeriodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Day => "day",
            PeriodKind::Week => "week",
            PeriodKind::Month => "month",
            PeriodKind::Year => "year",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAverage {
    pub period_start: NaiveDate,
    pub average: f64,
}
