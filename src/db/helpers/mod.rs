use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;

const DAY_FORMAT: &str = "%Y-%m-%d";

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

pub fn parse_day(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DAY_FORMAT)
        .with_context(|| format!("failed to parse {field} '{value}'"))
}

pub fn to_u32(value: i64, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| anyhow!("{field} contains out-of-range value {value}"))
}
