use chrono::{Duration, NaiveDate, TimeZone};

use crate::models::{DailyValue, ScreenTimeRecord, WakeRecord};
use crate::utils::calendar::month_start;
use crate::utils::DayCalendar;

/// Arithmetic mean. `None` for empty input and for any non-finite result.
pub fn average<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        return None;
    }
    let mean = sum / count as f64;
    mean.is_finite().then_some(mean)
}

/// Wake times as minutes after local midnight, keyed by the record's day.
/// Days without a wake time are dropped.
pub fn wake_series<Tz: TimeZone>(
    records: &[WakeRecord],
    calendar: &DayCalendar<Tz>,
) -> Vec<DailyValue> {
    records
        .iter()
        .filter_map(|record| {
            record.wake_time.map(|wake| DailyValue {
                day: record.day,
                value: calendar.minutes_from_midnight(wake),
            })
        })
        .collect()
}

/// Logged screen minutes. Skipped days are dropped.
pub fn screen_series(records: &[ScreenTimeRecord]) -> Vec<DailyValue> {
    records
        .iter()
        .filter_map(|record| {
            record.valid_minutes().map(|minutes| DailyValue {
                day: record.day,
                value: f64::from(minutes),
            })
        })
        .collect()
}

pub fn average_between(series: &[DailyValue], start: NaiveDate, end: NaiveDate) -> Option<f64> {
    average(
        series
            .iter()
            .filter(|point| point.day >= start && point.day <= end)
            .map(|point| point.value),
    )
}

/// Mean over `[today - 7 days, today]`.
pub fn weekly_average(series: &[DailyValue], today: NaiveDate) -> Option<f64> {
    average_between(series, today - Duration::days(7), today)
}

/// Mean over `[first of today's month, today]`.
pub fn monthly_average(series: &[DailyValue], today: NaiveDate) -> Option<f64> {
    average_between(series, month_start(today), today)
}

pub fn count_in_month(series: &[DailyValue], today: NaiveDate) -> usize {
    let start = month_start(today);
    series
        .iter()
        .filter(|point| point.day >= start && point.day <= today)
        .count()
}
