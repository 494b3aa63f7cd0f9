use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, OptionalExtension};

use crate::db::{helpers::format_day, Database};
use crate::models::MAX_MINUTES_PER_DAY;

impl Database {
    /// Store the total reported by the device-activity extension for a day.
    /// Later readings for the same day replace earlier ones.
    pub async fn record_auto_screen_time(&self, day: NaiveDate, minutes: f64) -> Result<()> {
        if !minutes.is_finite() || !(0.0..=f64::from(MAX_MINUTES_PER_DAY)).contains(&minutes) {
            bail!(
                "automatic screen time must be between 0 and {MAX_MINUTES_PER_DAY} minutes, got {minutes}"
            );
        }
        let updated_at = Utc::now().to_rfc3339();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO auto_screen_time (day, minutes, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(day) DO UPDATE
                 SET minutes = excluded.minutes,
                     updated_at = excluded.updated_at",
                params![format_day(day), minutes, updated_at],
            )
            .with_context(|| format!("failed to record automatic screen time for {day}"))?;
            Ok(())
        })
        .await
    }

    /// Automatic total for a day. A zero reading means the extension had no data.
    pub async fn auto_screen_time(&self, day: NaiveDate) -> Result<Option<f64>> {
        self.execute(move |conn| {
            let minutes: Option<f64> = conn
                .query_row(
                    "SELECT minutes FROM auto_screen_time WHERE day = ?1",
                    params![format_day(day)],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(minutes.filter(|m| *m > 0.0))
        })
        .await
    }
}
