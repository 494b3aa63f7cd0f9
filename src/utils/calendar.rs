//! Local-calendar arithmetic. Timestamps are stored in UTC; days, clock
//! minutes and night windows are always interpreted in the user's time zone.

use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
    Utc,
};
use serde::Serialize;

pub const DEFAULT_NIGHT_ANCHOR_HOUR: u32 = 14;

/// Half-open query window `[start, end)` bounding one night of sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NightWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl NightWindow {
    /// Samples belong to the night in which they start.
    pub fn contains_start(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts < self.end
    }
}

#[derive(Debug, Clone)]
pub struct DayCalendar<Tz: TimeZone> {
    tz: Tz,
    night_anchor_hour: u32,
}

impl DayCalendar<Local> {
    pub fn local() -> Self {
        Self::new(Local)
    }
}

impl<Tz: TimeZone> DayCalendar<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            night_anchor_hour: DEFAULT_NIGHT_ANCHOR_HOUR,
        }
    }

    pub fn with_night_anchor_hour(mut self, hour: u32) -> Self {
        self.night_anchor_hour = hour.min(23);
        self
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn night_anchor_hour(&self) -> u32 {
        self.night_anchor_hour
    }

    pub fn day_of(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.tz).date_naive()
    }

    /// Clock time of `ts` as minutes after local midnight (0..=1439). Seconds are dropped.
    pub fn minutes_from_midnight(&self, ts: DateTime<Utc>) -> f64 {
        let local = ts.with_timezone(&self.tz);
        f64::from(local.hour() * 60 + local.minute())
    }

    pub fn start_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        self.resolve_local(day.and_time(NaiveTime::MIN))
    }

    /// `[previous day @ anchor, day @ anchor)`, so one night is never split at midnight.
    pub fn night_window(&self, day: NaiveDate) -> NightWindow {
        let anchor =
            NaiveTime::from_hms_opt(self.night_anchor_hour, 0, 0).unwrap_or(NaiveTime::MIN);
        let previous = day.pred_opt().unwrap_or(day);
        NightWindow {
            start: self.resolve_local(previous.and_time(anchor)),
            end: self.resolve_local(day.and_time(anchor)),
        }
    }

    fn resolve_local(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        // Local times inside a DST gap do not exist; use the first instant after the gap.
        self.tz
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                self.tz
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest()
            })
            .unwrap_or_else(|| self.tz.from_utc_datetime(&naive))
            .with_timezone(&Utc)
    }
}

pub fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

pub fn year_start(day: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(day.year(), 1, 1).unwrap_or(day)
}

pub fn year_end(day: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(day.year(), 12, 31).unwrap_or(day)
}

pub fn month_end(day: NaiveDate) -> NaiveDate {
    let first = month_start(day);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next_month.and_then(|d| d.pred_opt()).unwrap_or(day)
}

/// Monday of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// Every day in `start..=end`, ascending. Empty when `start > end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}
