use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::db::{helpers::to_u32, Database};

impl Database {
    pub async fn stored_best_streak(&self, year: i32) -> Result<Option<u32>> {
        self.execute(move |conn| {
            let best: Option<i64> = conn
                .query_row(
                    "SELECT best FROM best_streaks WHERE year = ?1",
                    params![year],
                    |row| row.get(0),
                )
                .optional()?;
            best.map(|value| to_u32(value, "best_streaks.best"))
                .transpose()
        })
        .await
    }

    /// Merge a freshly computed best streak with the stored floor for `year`
    /// and persist the result, so the reported best never goes down.
    pub async fn reconcile_best_streak(&self, year: i32, computed: u32) -> Result<u32> {
        let updated_at = Utc::now().to_rfc3339();
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            let stored: Option<i64> = tx
                .query_row(
                    "SELECT best FROM best_streaks WHERE year = ?1",
                    params![year],
                    |row| row.get(0),
                )
                .optional()?;
            let stored = stored
                .map(|value| to_u32(value, "best_streaks.best"))
                .transpose()?;

            let best = stored.map_or(computed, |floor| floor.max(computed));
            if stored != Some(best) {
                tx.execute(
                    "INSERT INTO best_streaks (year, best, updated_at)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(year) DO UPDATE
                     SET best = excluded.best,
                         updated_at = excluded.updated_at",
                    params![year, best, updated_at],
                )
                .with_context(|| format!("failed to store best streak for {year}"))?;
            }

            tx.commit().context("failed to commit best streak")?;
            Ok(best)
        })
        .await
    }
}
