pub mod average;
pub mod chart;
pub mod period;

pub use average::{
    average, average_between, count_in_month, monthly_average, screen_series, wake_series,
    weekly_average,
};
pub use chart::{axis_ticks, chart_domain, format_hhmm, month_initial, ChartDomain};
pub use period::{aggregate, by_month, period_start};
