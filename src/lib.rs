//! Wake-time derivation, goal streaks and period averages for a daily habit
//! tracker. Sleep samples come from a [`SleepSampleProvider`]; manual
//! screen-time logs and yearly streak floors live in SQLite.

pub mod aggregate;
pub mod config;
pub mod db;
pub mod models;
pub mod settings;
pub mod sleep;
pub mod streak;
pub mod summary;
pub mod tracker;
pub mod utils;

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use chrono::Local;

pub use config::{SourcePolicy, TrackerConfig};
pub use db::Database;
pub use models::{
    DailyGoalStatus, DailyValue, Goals, MergedSegment, PeriodAverage, PeriodKind,
    ReminderSettings, ScreenTimeRecord, SleepSample, SleepStage, WakeRecord,
};
pub use settings::SettingsStore;
pub use sleep::{InMemorySleepProvider, SleepSampleProvider};
pub use streak::StreakSummary;
pub use summary::{Dashboard, Trend, TrendSeries};
pub use tracker::Tracker;
pub use utils::{DayCalendar, NightWindow};

/// Install the `env_logger` backend (reads `RUST_LOG`). Safe to call more
/// than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

/// Open the database and settings under `data_dir` and build a tracker in
/// the device's local time zone.
pub fn open_tracker(
    data_dir: &Path,
    provider: Arc<dyn SleepSampleProvider>,
) -> Result<Tracker<Local>> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let database = Database::new(data_dir.join("averaged.sqlite3"))?;
    let settings = SettingsStore::new(data_dir.join("settings.json"))?;
    let config = TrackerConfig::from_env();

    log::info!(
        "Tracker ready (night anchor {}:00, lookback {} days, source policy {})",
        config.night_anchor_hour,
        config.lookback_days,
        config.source_policy.as_str()
    );

    Ok(Tracker::new(
        provider,
        database,
        Arc::new(settings),
        DayCalendar::local(),
        config,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn open_tracker_creates_store_files() {
        init_logging();
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("nested");

        let tracker = open_tracker(&data_dir, Arc::new(InMemorySleepProvider::default())).unwrap();

        assert!(data_dir.join("averaged.sqlite3").exists());
        assert_eq!(tracker.goals(), Goals::default());
        assert_eq!(tracker.database().path(), data_dir.join("averaged.sqlite3"));
    }
}
