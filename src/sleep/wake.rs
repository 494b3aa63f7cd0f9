use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::config::SourcePolicy;
use crate::models::{MergedSegment, SleepSample, WakeRecord};
use crate::sleep::normalize::normalize_night;
use crate::utils::{DayCalendar, NightWindow};

/// End of the latest asleep segment. Trailing `Awake`/`InBed` segments are ignored.
pub fn latest_asleep_end(segments: &[MergedSegment]) -> Option<DateTime<Utc>> {
    segments
        .iter()
        .filter(|segment| segment.stage.is_asleep())
        .map(|segment| segment.end_time)
        .max()
}

/// Wake timestamp for one night. Only samples starting inside `window` are
/// considered; no asleep data yields `None`.
pub fn resolve_wake_time(
    samples: &[SleepSample],
    window: &NightWindow,
    policy: SourcePolicy,
) -> Option<DateTime<Utc>> {
    let segments = normalize_night(
        samples
            .iter()
            .filter(|sample| window.contains_start(sample.start_time)),
        policy,
    );
    latest_asleep_end(&segments)
}

pub fn resolve_wake_record<Tz: TimeZone>(
    day: NaiveDate,
    samples: &[SleepSample],
    calendar: &DayCalendar<Tz>,
    policy: SourcePolicy,
) -> WakeRecord {
    let window = calendar.night_window(day);
    WakeRecord {
        day,
        wake_time: resolve_wake_time(samples, &window, policy),
    }
}
