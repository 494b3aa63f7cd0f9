use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::aggregate::average::average;
use crate::models::{DailyValue, PeriodAverage, PeriodKind};
use crate::utils::calendar::{month_end, month_start, week_start, year_end, year_start};

/// First day of the bucket of `kind` that contains `day`.
pub fn period_start(kind: PeriodKind, day: NaiveDate) -> NaiveDate {
    match kind {
        PeriodKind::Day => day,
        PeriodKind::Week => week_start(day),
        PeriodKind::Month => month_start(day),
        PeriodKind::Year => year_start(day),
    }
}

/// Inclusive day range a series of `kind` covers around `anchor`:
/// days of the anchor's month, weeks and months of the anchor's year, or
/// every year up to and including the anchor's.
pub fn scope(kind: PeriodKind, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
    match kind {
        PeriodKind::Day => (month_start(anchor), month_end(anchor)),
        PeriodKind::Week | PeriodKind::Month => (year_start(anchor), year_end(anchor)),
        PeriodKind::Year => (NaiveDate::MIN, year_end(anchor)),
    }
}

/// Average `series` per period. Periods without data are omitted rather than
/// zero-filled; output is ordered by period start. A week that began in the
/// previous year holds only this year's days and is labelled January 1.
pub fn aggregate(series: &[DailyValue], kind: PeriodKind, anchor: NaiveDate) -> Vec<PeriodAverage> {
    let (start, end) = scope(kind, anchor);
    let mut buckets: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();

    for point in series.iter().filter(|p| p.day >= start && p.day <= end) {
        buckets
            .entry(period_start(kind, point.day).max(start))
            .or_default()
            .push(point.value);
    }

    buckets
        .into_iter()
        .filter_map(|(start, values)| {
            average(values).map(|average| PeriodAverage {
                period_start: start,
                average,
            })
        })
        .collect()
}

/// Months of `year` that have data, as (month number, average).
pub fn by_month(series: &[DailyValue], year: i32) -> Vec<(u32, f64)> {
    match NaiveDate::from_ymd_opt(year, 1, 1) {
        Some(anchor) => aggregate(series, PeriodKind::Month, anchor)
            .into_iter()
            .map(|p| (p.period_start.month(), p.average))
            .collect(),
        None => Vec::new(),
    }
}
