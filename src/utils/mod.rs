pub mod calendar;
pub mod logging;

pub use calendar::{DayCalendar, NightWindow};
