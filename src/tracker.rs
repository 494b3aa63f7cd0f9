use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use tokio::sync::watch;

use crate::aggregate::period::scope;
use crate::config::TrackerConfig;
use crate::db::Database;
use crate::models::{Goals, PeriodKind, WakeRecord};
use crate::settings::SettingsStore;
use crate::sleep::{fetch_wake_records, resolve_wake_time, SleepSampleProvider};
use crate::summary::{Dashboard, Trend};
use crate::utils::calendar::year_start;
use crate::utils::DayCalendar;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Owns every collaborator the dashboard and trend views need. Goal changes
/// go through [`Tracker::update_goals`], which persists them and returns the
/// recomputed dashboard.
pub struct Tracker<Tz: TimeZone> {
    provider: Arc<dyn SleepSampleProvider>,
    db: Database,
    settings: Arc<SettingsStore>,
    calendar: DayCalendar<Tz>,
    config: TrackerConfig,
}

impl<Tz: TimeZone> Tracker<Tz> {
    pub fn new(
        provider: Arc<dyn SleepSampleProvider>,
        db: Database,
        settings: Arc<SettingsStore>,
        calendar: DayCalendar<Tz>,
        config: TrackerConfig,
    ) -> Self {
        let calendar = calendar.with_night_anchor_hour(config.night_anchor_hour);
        Self {
            provider,
            db,
            settings,
            calendar,
            config,
        }
    }

    pub fn calendar(&self) -> &DayCalendar<Tz> {
        &self.calendar
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn goals(&self) -> Goals {
        self.settings.goals()
    }

    pub fn subscribe_goals(&self) -> watch::Receiver<Goals> {
        self.settings.subscribe()
    }

    pub fn today(&self) -> NaiveDate {
        self.calendar.day_of(Utc::now())
    }

    /// Wake time for the night that ends on `day`, or `None` when no asleep
    /// samples were recorded in that night's window.
    pub async fn resolve_wake_time(&self, day: NaiveDate) -> Result<Option<DateTime<Utc>>> {
        let window = self.calendar.night_window(day);
        let samples = self
            .provider
            .fetch_sleep_samples(window.start, window.end)
            .await?;
        Ok(resolve_wake_time(&samples, &window, self.config.source_policy))
    }

    pub async fn wake_records(&self, days: impl IntoIterator<Item = NaiveDate>) -> Vec<WakeRecord> {
        fetch_wake_records(
            Arc::clone(&self.provider),
            &self.calendar,
            self.config.source_policy,
            days,
        )
        .await
    }

    /// The configured lookback ending at `today`, extended back to January 1
    /// so the yearly best streak sees the whole year.
    pub async fn recent_wake_records(&self, today: NaiveDate) -> Vec<WakeRecord> {
        let lookback = i64::from(self.config.lookback_days.max(1)) - 1;
        let start = (today - Duration::days(lookback)).min(year_start(today));
        self.wake_records(start.iter_days().take_while(|day| *day <= today))
            .await
    }

    /// Recompute the dashboard for `today`. The yearly best streak never
    /// drops below the value stored for the year.
    pub async fn dashboard(&self, today: NaiveDate) -> Result<Dashboard> {
        let wake = self.recent_wake_records(today).await;
        let screen = self.db.effective_screen_time_records().await?;

        let mut dashboard = Dashboard::compute(&wake, &screen, &self.calendar, self.goals(), today);
        let computed = dashboard.streaks.best_this_year;
        dashboard.streaks.best_this_year = self
            .db
            .reconcile_best_streak(today.year(), computed)
            .await?;

        log_debug!(
            "Dashboard for {today}: current streak {}, best {} (computed {computed})",
            dashboard.streaks.current,
            dashboard.streaks.best_this_year
        );
        Ok(dashboard)
    }

    pub async fn update_goals(&self, goals: Goals, today: NaiveDate) -> Result<Dashboard> {
        self.settings.update_goals(goals)?;
        log_info!(
            "Goals updated: wake {} min, screen {} min",
            goals.goal_wake_minutes,
            goals.goal_screen_minutes
        );
        self.dashboard(today).await
    }

    /// Per-period averages around `anchor`. The all-years view only reaches
    /// back as far as the configured lookback. Nights after both `anchor` and
    /// today cannot have data yet and are not fetched.
    pub async fn trend(&self, kind: PeriodKind, anchor: NaiveDate) -> Result<Trend> {
        let (start, end) = scope(kind, anchor);
        let start = match kind {
            PeriodKind::Year => {
                let lookback = i64::from(self.config.lookback_days.max(1)) - 1;
                start.max(anchor - Duration::days(lookback))
            }
            _ => start,
        };
        let end = end.min(anchor.max(self.today()));

        log_debug!("Building {} trend for {start}..={end}", kind.as_str());

        let wake = self
            .wake_records(start.iter_days().take_while(|day| *day <= end))
            .await;
        let screen = self.db.effective_screen_time_records().await?;

        Ok(Trend::compute(
            &wake,
            &screen,
            &self.calendar,
            &self.goals(),
            kind,
            anchor,
        ))
    }
}
