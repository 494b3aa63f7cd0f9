use log::warn;
use serde::{Deserialize, Serialize};

use crate::utils::calendar::DEFAULT_NIGHT_ANCHOR_HOUR;

/// How the normalizer picks one provider when several reported the same night.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SourcePolicy {
    /// A source that reported REM or Deep stages wins; ties go to fewer samples.
    #[default]
    PreferDetailedStages,
    /// Fewest samples wins regardless of stage detail.
    FewestSamples,
}

impl SourcePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourcePolicy::PreferDetailedStages => "prefer-detailed-stages",
            SourcePolicy::FewestSamples => "fewest-samples",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "prefer-detailed-stages" | "detailed" => Some(SourcePolicy::PreferDetailedStages),
            "fewest-samples" | "fewest" => Some(SourcePolicy::FewestSamples),
            _ => None,
        }
    }
}

/// Tunables for wake-time derivation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackerConfig {
    /// Local hour at which one night window ends and the next begins.
    pub night_anchor_hour: u32,

    /// How many days back the dashboard resolves wake times.
    pub lookback_days: u32,

    pub source_policy: SourcePolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            night_anchor_hour: DEFAULT_NIGHT_ANCHOR_HOUR,
            lookback_days: 365,
            source_policy: SourcePolicy::default(),
        }
    }
}

impl TrackerConfig {
    /// Defaults, overridden by `AVERAGED_NIGHT_ANCHOR_HOUR`, `AVERAGED_LOOKBACK_DAYS`
    /// and `AVERAGED_SOURCE_POLICY` when set. Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("AVERAGED_NIGHT_ANCHOR_HOUR") {
            match raw.trim().parse::<u32>() {
                Ok(hour) if hour < 24 => config.night_anchor_hour = hour,
                _ => warn!("Ignoring AVERAGED_NIGHT_ANCHOR_HOUR={raw}: expected 0-23"),
            }
        }

        if let Some(raw) = lookup("AVERAGED_LOOKBACK_DAYS") {
            match raw.trim().parse::<u32>() {
                Ok(days) if days > 0 => config.lookback_days = days,
                _ => warn!("Ignoring AVERAGED_LOOKBACK_DAYS={raw}: expected a positive integer"),
            }
        }

        if let Some(raw) = lookup("AVERAGED_SOURCE_POLICY") {
            match SourcePolicy::parse(&raw) {
                Some(policy) => config.source_policy = policy,
                None => warn!("Ignoring AVERAGED_SOURCE_POLICY={raw}: unknown policy"),
            }
        }

        config
    }
}
