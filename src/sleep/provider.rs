use std::{collections::BTreeMap, collections::BTreeSet, future::Future, pin::Pin, sync::Arc};

use anyhow::Result;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tokio::task::JoinSet;

use crate::config::SourcePolicy;
use crate::models::{SleepSample, WakeRecord};
use crate::sleep::wake::resolve_wake_time;
use crate::utils::DayCalendar;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_warn};

pub type SampleFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<SleepSample>>> + Send + 'a>>;

/// Source of raw sleep samples, e.g. a bridge to the platform health store.
pub trait SleepSampleProvider: Send + Sync {
    fn fetch_sleep_samples(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> SampleFuture<'_>;
}

/// Provider backed by an in-memory snapshot of samples.
#[derive(Debug, Clone, Default)]
pub struct InMemorySleepProvider {
    samples: Vec<SleepSample>,
}

impl InMemorySleepProvider {
    pub fn new(samples: Vec<SleepSample>) -> Self {
        Self { samples }
    }
}

impl SleepSampleProvider for InMemorySleepProvider {
    fn fetch_sleep_samples(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> SampleFuture<'_> {
        let matching: Vec<SleepSample> = self
            .samples
            .iter()
            .filter(|s| s.start_time >= window_start && s.start_time < window_end)
            .cloned()
            .collect();
        Box::pin(async move { Ok(matching) })
    }
}

/// Resolve one `WakeRecord` per distinct requested day.
///
/// Every night window is fetched concurrently and the results are joined
/// before resolution, so the output depends only on the provider's data and
/// never on completion order. A failed fetch leaves that day without a wake time.
pub async fn fetch_wake_records<Tz: TimeZone>(
    provider: Arc<dyn SleepSampleProvider>,
    calendar: &DayCalendar<Tz>,
    policy: SourcePolicy,
    days: impl IntoIterator<Item = NaiveDate>,
) -> Vec<WakeRecord> {
    let days: BTreeSet<NaiveDate> = days.into_iter().collect();
    let mut tasks = JoinSet::new();

    for day in days.iter().copied() {
        let provider = Arc::clone(&provider);
        let window = calendar.night_window(day);
        tasks.spawn(async move {
            let fetched = provider
                .fetch_sleep_samples(window.start, window.end)
                .await;
            (day, window, fetched)
        });
    }

    let mut resolved: BTreeMap<NaiveDate, Option<DateTime<Utc>>> = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((day, window, Ok(samples))) => {
                resolved.insert(day, resolve_wake_time(&samples, &window, policy));
            }
            Ok((day, _, Err(err))) => {
                log_warn!("sleep sample fetch for {day} failed: {err:#}");
                resolved.insert(day, None);
            }
            Err(err) => log_error!("sleep sample fetch task panicked: {err}"),
        }
    }

    days.into_iter()
        .map(|day| WakeRecord {
            day,
            wake_time: resolved.get(&day).copied().flatten(),
        })
        .collect()
}
