pub mod goals;
pub mod records;
pub mod sleep;

pub use goals::{Goals, ReminderSettings};
pub use records::{
    DailyGoalStatus, DailyValue, PeriodAverage, PeriodKind, ScreenTimeRecord, WakeRecord,
    MAX_MINUTES_PER_DAY, SKIPPED_MINUTES,
};
pub use sleep::{MergedSegment, SleepSample, SleepStage};
