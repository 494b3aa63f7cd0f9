//! Snapshot views consumed by the presentation layer.

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::aggregate::{
    aggregate, axis_ticks, chart_domain, count_in_month, monthly_average, screen_series,
    wake_series, weekly_average, ChartDomain,
};
use crate::aggregate::chart::{SCREEN_STRIDE, WAKE_STRIDE};
use crate::models::{DailyValue, Goals, PeriodAverage, PeriodKind, ScreenTimeRecord, WakeRecord};
use crate::streak::{summarize, GoalLookup, StreakSummary};
use crate::utils::DayCalendar;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub today: NaiveDate,
    pub goals: Goals,
    pub weekly_wake_average: Option<f64>,
    pub monthly_wake_average: Option<f64>,
    pub weekly_screen_average: Option<f64>,
    pub monthly_screen_average: Option<f64>,
    pub wake_days_this_month: usize,
    pub streaks: StreakSummary,
}

impl Dashboard {
    pub fn compute<Tz: TimeZone>(
        wake_records: &[WakeRecord],
        screen_records: &[ScreenTimeRecord],
        calendar: &DayCalendar<Tz>,
        goals: Goals,
        today: NaiveDate,
    ) -> Self {
        let wake = wake_series(wake_records, calendar);
        let screen = screen_series(screen_records);
        let lookup = GoalLookup::from_records(wake_records, screen_records, calendar);

        Self {
            today,
            goals,
            weekly_wake_average: weekly_average(&wake, today),
            monthly_wake_average: monthly_average(&wake, today),
            weekly_screen_average: weekly_average(&screen, today),
            monthly_screen_average: monthly_average(&screen, today),
            wake_days_this_month: count_in_month(&wake, today),
            streaks: summarize(&lookup, &goals, today),
        }
    }

    /// Whether this week's average wake time is at or before the goal.
    pub fn wake_on_track(&self) -> Option<bool> {
        self.weekly_wake_average
            .map(|avg| avg <= self.goals.goal_wake_minutes)
    }

    pub fn screen_on_track(&self) -> Option<bool> {
        self.weekly_screen_average
            .map(|avg| avg <= f64::from(self.goals.goal_screen_minutes))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub points: Vec<PeriodAverage>,
    pub goal: f64,
    pub domain: ChartDomain,
    pub ticks: Vec<f64>,
}

impl TrendSeries {
    fn build(series: &[DailyValue], kind: PeriodKind, anchor: NaiveDate, goal: f64, stride: f64) -> Self {
        let points = aggregate(series, kind, anchor);
        let values: Vec<f64> = points.iter().map(|p| p.average).collect();
        let domain = chart_domain(&values, goal);
        Self {
            ticks: axis_ticks(&domain, stride),
            points,
            goal,
            domain,
        }
    }
}

/// Wake and screen-time averages per period around `anchor`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub kind: PeriodKind,
    pub anchor: NaiveDate,
    pub wake: TrendSeries,
    pub screen: TrendSeries,
}

impl Trend {
    pub fn compute<Tz: TimeZone>(
        wake_records: &[WakeRecord],
        screen_records: &[ScreenTimeRecord],
        calendar: &DayCalendar<Tz>,
        goals: &Goals,
        kind: PeriodKind,
        anchor: NaiveDate,
    ) -> Self {
        let wake = wake_series(wake_records, calendar);
        let screen = screen_series(screen_records);
        Self {
            kind,
            anchor,
            wake: TrendSeries::build(&wake, kind, anchor, goals.goal_wake_minutes, WAKE_STRIDE),
            screen: TrendSeries::build(
                &screen,
                kind,
                anchor,
                f64::from(goals.goal_screen_minutes),
                SCREEN_STRIDE,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn wake_at(calendar: &DayCalendar<Utc>, day: NaiveDate, minutes: i64) -> WakeRecord {
        WakeRecord {
            day,
            wake_time: Some(calendar.start_of_day(day) + Duration::minutes(minutes)),
        }
    }

    #[test]
    fn dashboard_combines_averages_and_streaks() {
        let calendar = DayCalendar::new(Utc);
        let today = date(3, 10);
        let wake = vec![
            wake_at(&calendar, date(3, 8), 330),
            wake_at(&calendar, date(3, 9), 350),
            WakeRecord { day: date(3, 10), wake_time: None },
            wake_at(&calendar, date(2, 20), 500),
        ];
        let screen = vec![
            ScreenTimeRecord::new(date(3, 8), 100),
            ScreenTimeRecord::new(date(3, 9), 110),
            ScreenTimeRecord::skipped(date(3, 7)),
        ];

        let dashboard = Dashboard::compute(&wake, &screen, &calendar, Goals::default(), today);

        assert_eq!(dashboard.weekly_wake_average, Some(340.0));
        assert_eq!(dashboard.monthly_wake_average, Some(340.0));
        assert_eq!(dashboard.weekly_screen_average, Some(105.0));
        assert_eq!(dashboard.wake_days_this_month, 2);
        assert_eq!(dashboard.streaks.current, 2);
        assert_eq!(dashboard.streaks.best_this_year, 2);
        assert_eq!(dashboard.wake_on_track(), Some(true));
        assert_eq!(dashboard.screen_on_track(), Some(true));
    }

    #[test]
    fn empty_snapshot_yields_empty_dashboard() {
        let calendar = DayCalendar::new(Utc);
        let dashboard = Dashboard::compute(&[], &[], &calendar, Goals::default(), date(1, 1));

        assert_eq!(dashboard.weekly_wake_average, None);
        assert_eq!(dashboard.monthly_screen_average, None);
        assert_eq!(dashboard.streaks, StreakSummary::default());
        assert_eq!(dashboard.wake_on_track(), None);
    }

    #[test]
    fn yearly_trend_has_gaps_and_goal_visible_domain() {
        let calendar = DayCalendar::new(Utc);
        let wake = vec![
            wake_at(&calendar, date(1, 10), 420),
            wake_at(&calendar, date(1, 11), 440),
            wake_at(&calendar, date(4, 2), 400),
        ];
        let screen = vec![ScreenTimeRecord::new(date(2, 1), 200)];

        let trend = Trend::compute(
            &wake,
            &screen,
            &calendar,
            &Goals::default(),
            PeriodKind::Month,
            date(6, 1),
        );

        assert_eq!(trend.wake.points.len(), 2);
        assert_eq!(trend.wake.points[0].average, 430.0);
        assert!(trend.wake.domain.contains(360.0));
        assert_eq!(trend.wake.domain.lower, 330.0);
        assert_eq!(trend.screen.points.len(), 1);
        assert!(trend.screen.domain.contains(120.0));
        assert!(trend.screen.ticks.iter().all(|t| t % SCREEN_STRIDE == 0.0));
    }
}
