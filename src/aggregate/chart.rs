//! Axis helpers for the charts that plot minute-of-day and minute-count series.

use serde::Serialize;

pub const MINUTES_IN_DAY: f64 = 1440.0;
pub const DEFAULT_STRIDE: f64 = 30.0;
pub const WAKE_STRIDE: f64 = 30.0;
pub const SCREEN_STRIDE: f64 = 60.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartDomain {
    pub lower: f64,
    pub upper: f64,
}

impl ChartDomain {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Padded y-axis range that always includes the goal line: min rounded down
/// and max rounded up to a 30-minute boundary, widened by one more step on
/// each side, then clamped to `[0, 1440]`.
pub fn chart_domain(values: &[f64], goal: f64) -> ChartDomain {
    let (min, max) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((goal, goal), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let lower = (min / DEFAULT_STRIDE).floor() * DEFAULT_STRIDE - DEFAULT_STRIDE;
    let upper = (max / DEFAULT_STRIDE).ceil() * DEFAULT_STRIDE + DEFAULT_STRIDE;

    ChartDomain {
        lower: lower.max(0.0),
        upper: upper.min(MINUTES_IN_DAY),
    }
}

/// Tick positions every `stride` minutes from the first multiple at or above
/// `domain.lower` up to `domain.upper`.
pub fn axis_ticks(domain: &ChartDomain, stride: f64) -> Vec<f64> {
    if stride <= 0.0 || !stride.is_finite() {
        return Vec::new();
    }
    let mut ticks = Vec::new();
    let mut tick = (domain.lower / stride).ceil() * stride;
    while tick <= domain.upper {
        ticks.push(tick);
        tick += stride;
    }
    ticks
}

/// "HH:MM" for a minute count; works for clock times and durations alike.
pub fn format_hhmm(minutes: f64) -> String {
    let total = minutes.max(0.0) as i64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// One-letter month label for compact yearly axes.
pub fn month_initial(month: u32) -> Option<char> {
    const INITIALS: [char; 12] = ['J', 'F', 'M', 'A', 'M', 'J', 'J', 'A', 'S', 'O', 'N', 'D'];
    month
        .checked_sub(1)
        .and_then(|index| INITIALS.get(index as usize).copied())
}
