//! Sleep data as delivered by a health-data provider, and the merged
//! timeline derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SleepStage {
    InBed,
    Awake,
    Core,
    Deep,
    Rem,
    AsleepUnspecified,
    Other,
}

impl SleepStage {
    /// Stages that count as actually sleeping when locating the wake boundary.
    pub fn is_asleep(&self) -> bool {
        matches!(
            self,
            SleepStage::Core | SleepStage::Deep | SleepStage::Rem | SleepStage::AsleepUnspecified
        )
    }

    /// Stages only reported by trackers that measure sleep architecture.
    pub fn is_detailed(&self) -> bool {
        matches!(self, SleepStage::Deep | SleepStage::Rem)
    }
}

/// One raw sleep record from a single provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SleepSample {
    pub stage: SleepStage,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub source_id: String,
}

impl SleepSample {
    pub fn new(
        stage: SleepStage,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            start_time,
            end_time,
            source_id: source_id.into(),
        }
    }
}

/// A run of one stage in a night's non-overlapping timeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MergedSegment {
    pub stage: SleepStage,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}
