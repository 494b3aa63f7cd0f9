use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::{
    helpers::{format_day, parse_day},
    Database,
};
use crate::models::{ScreenTimeRecord, MAX_MINUTES_PER_DAY, SKIPPED_MINUTES};

fn load_manual_records(conn: &Connection) -> Result<Vec<ScreenTimeRecord>> {
    let mut stmt = conn.prepare("SELECT day, minutes FROM screen_time ORDER BY day DESC")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i32>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(day, minutes)| {
            Ok(ScreenTimeRecord::new(
                parse_day(&day, "screen_time.day")?,
                minutes,
            ))
        })
        .collect()
}

impl Database {
    /// Log screen time for a day, replacing any earlier value or skip.
    pub async fn upsert_screen_time(&self, day: NaiveDate, minutes: i32) -> Result<()> {
        if !(0..=MAX_MINUTES_PER_DAY).contains(&minutes) {
            bail!("screen time must be between 0 and {MAX_MINUTES_PER_DAY} minutes, got {minutes}");
        }
        self.write_screen_time(day, minutes).await
    }

    /// Mark a day as not applicable. Skipped days are excluded from averages
    /// and never count towards a streak.
    pub async fn skip_day(&self, day: NaiveDate) -> Result<()> {
        self.write_screen_time(day, SKIPPED_MINUTES).await
    }

    async fn write_screen_time(&self, day: NaiveDate, minutes: i32) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO screen_time (day, minutes, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(day) DO UPDATE
                 SET minutes = excluded.minutes,
                     updated_at = excluded.updated_at",
                params![format_day(day), minutes, updated_at],
            )
            .with_context(|| format!("failed to write screen time for {day}"))?;
            Ok(())
        })
        .await
    }

    pub async fn get_screen_time(&self, day: NaiveDate) -> Result<Option<ScreenTimeRecord>> {
        self.execute(move |conn| {
            let minutes: Option<i32> = conn
                .query_row(
                    "SELECT minutes FROM screen_time WHERE day = ?1",
                    params![format_day(day)],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(minutes.map(|minutes| ScreenTimeRecord::new(day, minutes)))
        })
        .await
    }

    pub async fn is_skipped_day(&self, day: NaiveDate) -> Result<bool> {
        Ok(self
            .get_screen_time(day)
            .await?
            .is_some_and(|record| record.is_skipped()))
    }

    /// Returns whether a record existed.
    pub async fn delete_screen_time(&self, day: NaiveDate) -> Result<bool> {
        self.execute(move |conn| {
            let deleted = conn
                .execute(
                    "DELETE FROM screen_time WHERE day = ?1",
                    params![format_day(day)],
                )
                .with_context(|| format!("failed to delete screen time for {day}"))?;
            Ok(deleted > 0)
        })
        .await
    }

    /// Manually logged records, newest first, skip sentinels included.
    pub async fn all_screen_time_records(&self) -> Result<Vec<ScreenTimeRecord>> {
        self.execute(|conn| load_manual_records(conn)).await
    }

    /// Manual records merged with automatic readings, newest first. A manual
    /// value or skip always wins; automatic totals only fill days the user
    /// never touched, rounded to whole minutes.
    pub async fn effective_screen_time_records(&self) -> Result<Vec<ScreenTimeRecord>> {
        self.execute(|conn| {
            let mut by_day: BTreeMap<NaiveDate, ScreenTimeRecord> = load_manual_records(conn)?
                .into_iter()
                .map(|record| (record.day, record))
                .collect();

            let mut stmt =
                conn.prepare("SELECT day, minutes FROM auto_screen_time WHERE minutes > 0")?;
            let auto_rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            for (day, minutes) in auto_rows {
                let day = parse_day(&day, "auto_screen_time.day")?;
                by_day
                    .entry(day)
                    .or_insert_with(|| ScreenTimeRecord::new(day, minutes.round() as i32));
            }

            Ok(by_day.into_values().rev().collect())
        })
        .await
    }
}
