use std::{cmp::Reverse, collections::BTreeMap};

use chrono::{DateTime, Utc};

use crate::config::SourcePolicy;
use crate::models::{MergedSegment, SleepSample};

const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Per-provider statistics used to choose one source for a night.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary<'a> {
    pub source_id: &'a str,
    pub sample_count: usize,
    pub has_detailed_stages: bool,
}

pub fn summarize_sources<'a, I>(samples: I) -> Vec<SourceSummary<'a>>
where
    I: IntoIterator<Item = &'a SleepSample>,
{
    let mut by_source: BTreeMap<&'a str, SourceSummary<'a>> = BTreeMap::new();
    for sample in samples {
        let summary = by_source
            .entry(sample.source_id.as_str())
            .or_insert_with(|| SourceSummary {
                source_id: sample.source_id.as_str(),
                sample_count: 0,
                has_detailed_stages: false,
            });
        summary.sample_count += 1;
        summary.has_detailed_stages |= sample.stage.is_detailed();
    }
    by_source.into_values().collect()
}

/// Pick the provider whose data describes the night. Equal candidates fall
/// back to the smallest source id so the choice never depends on input order.
pub fn select_source<'a, I>(samples: I, policy: SourcePolicy) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a SleepSample>,
{
    let summaries = summarize_sources(samples);
    let best = match policy {
        SourcePolicy::PreferDetailedStages => summaries
            .into_iter()
            .min_by_key(|s| (!s.has_detailed_stages, s.sample_count, s.source_id)),
        SourcePolicy::FewestSamples => summaries
            .into_iter()
            .min_by_key(|s| (s.sample_count, s.source_id)),
    };
    best.map(|summary| summary.source_id)
}

/// Flatten one source's samples into a non-overlapping timeline.
///
/// Where samples overlap, the one that started most recently owns the overlap
/// and an enclosing sample resumes once it ends. Same-stage pieces that touch
/// merge into one segment; a stage change or a gap closes the segment.
pub fn coalesce<'a, I>(samples: I) -> Vec<MergedSegment>
where
    I: IntoIterator<Item = &'a SleepSample>,
{
    let samples: Vec<&SleepSample> = samples
        .into_iter()
        .filter(|s| s.start_time < s.end_time)
        .collect();

    let mut bounds: Vec<DateTime<Utc>> = samples
        .iter()
        .flat_map(|s| [s.start_time, s.end_time])
        .collect();
    bounds.sort();
    bounds.dedup();

    let mut merged: Vec<MergedSegment> = Vec::new();
    for pair in bounds.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let owner = samples
            .iter()
            .filter(|s| s.start_time <= from && to <= s.end_time)
            .max_by_key(|s| (s.start_time, Reverse(s.end_time), s.stage));
        let Some(owner) = owner else {
            continue;
        };

        if let Some(last) = merged.last_mut() {
            if last.stage == owner.stage && last.end_time == from {
                last.end_time = to;
                continue;
            }
        }
        merged.push(MergedSegment {
            stage: owner.stage,
            start_time: from,
            end_time: to,
        });
    }

    merged
}

/// Collapse one night's raw samples into the chosen source's merged timeline.
/// Empty input yields an empty timeline.
pub fn normalize_night<'a, I>(samples: I, policy: SourcePolicy) -> Vec<MergedSegment>
where
    I: IntoIterator<Item = &'a SleepSample>,
{
    let samples: Vec<&SleepSample> = samples.into_iter().collect();
    let Some(source_id) = select_source(samples.iter().copied(), policy) else {
        return Vec::new();
    };

    log_debug!(
        "normalizing {} samples, chose source {source_id} ({})",
        samples.len(),
        policy.as_str()
    );

    coalesce(
        samples
            .into_iter()
            .filter(|sample| sample.source_id == source_id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SleepStage;
    use crate::sleep::wake::resolve_wake_time;
    use crate::utils::NightWindow;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, minute, 0).unwrap()
    }

    fn sample(stage: SleepStage, start: (u32, u32), end: (u32, u32), source: &str) -> SleepSample {
        SleepSample::new(stage, at(start.0, start.1), at(end.0, end.1), source)
    }

    fn as_samples(segments: &[MergedSegment], source: &str) -> Vec<SleepSample> {
        segments
            .iter()
            .map(|s| SleepSample::new(s.stage, s.start_time, s.end_time, source))
            .collect()
    }

    #[test]
    fn empty_input_yields_empty_timeline() {
        let samples: Vec<SleepSample> = Vec::new();
        assert!(normalize_night(&samples, SourcePolicy::default()).is_empty());
        assert_eq!(select_source(&samples, SourcePolicy::default()), None);
    }

    #[test]
    fn awake_gap_splits_core_runs() {
        let samples = vec![
            sample(SleepStage::Core, (1, 0), (3, 0), "watch"),
            sample(SleepStage::Awake, (3, 0), (3, 10), "watch"),
            sample(SleepStage::Core, (3, 10), (6, 30), "watch"),
        ];

        let merged = normalize_night(&samples, SourcePolicy::default());
        let core: Vec<_> = merged
            .iter()
            .filter(|s| s.stage == SleepStage::Core)
            .collect();

        assert_eq!(merged.len(), 3);
        assert_eq!(core.len(), 2);
        assert_eq!(core[1].end_time, at(6, 30));
    }

    #[test]
    fn overlapping_and_touching_same_stage_samples_merge() {
        let samples = vec![
            sample(SleepStage::Core, (2, 0), (4, 0), "watch"),
            sample(SleepStage::Core, (1, 0), (2, 30), "watch"),
            sample(SleepStage::Core, (4, 0), (5, 0), "watch"),
            sample(SleepStage::Core, (2, 15), (3, 0), "watch"),
        ];

        let merged = coalesce(&samples);

        assert_eq!(
            merged,
            vec![MergedSegment {
                stage: SleepStage::Core,
                start_time: at(1, 0),
                end_time: at(5, 0),
            }]
        );
    }

    #[test]
    fn gap_between_same_stage_keeps_segments_apart() {
        let samples = vec![
            sample(SleepStage::Deep, (1, 0), (2, 0), "watch"),
            sample(SleepStage::Deep, (2, 1), (3, 0), "watch"),
        ];
        assert_eq!(coalesce(&samples).len(), 2);
    }

    #[test]
    fn detailed_source_beats_coarse_phone_data() {
        let samples = vec![
            sample(SleepStage::InBed, (0, 0), (7, 0), "phone"),
            sample(SleepStage::Core, (0, 30), (2, 0), "watch"),
            sample(SleepStage::Rem, (2, 0), (3, 0), "watch"),
            sample(SleepStage::Core, (3, 0), (6, 45), "watch"),
        ];

        assert_eq!(
            select_source(&samples, SourcePolicy::PreferDetailedStages),
            Some("watch")
        );
        assert_eq!(
            select_source(&samples, SourcePolicy::FewestSamples),
            Some("phone")
        );

        let merged = normalize_night(&samples, SourcePolicy::PreferDetailedStages);
        assert!(merged.iter().all(|s| s.stage != SleepStage::InBed));
    }

    #[test]
    fn equally_detailed_sources_prefer_fewer_samples() {
        let samples = vec![
            sample(SleepStage::Deep, (1, 0), (2, 0), "ring"),
            sample(SleepStage::Core, (2, 0), (6, 0), "ring"),
            sample(SleepStage::Deep, (1, 0), (1, 30), "watch"),
            sample(SleepStage::Core, (1, 30), (3, 0), "watch"),
            sample(SleepStage::Rem, (3, 0), (6, 0), "watch"),
        ];
        assert_eq!(
            select_source(&samples, SourcePolicy::PreferDetailedStages),
            Some("ring")
        );
    }

    #[test]
    fn full_tie_is_broken_by_source_id_regardless_of_order() {
        let forward = vec![
            sample(SleepStage::Core, (1, 0), (6, 0), "b-source"),
            sample(SleepStage::Core, (1, 0), (6, 30), "a-source"),
        ];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();

        assert_eq!(select_source(&forward, SourcePolicy::default()), Some("a-source"));
        assert_eq!(select_source(&reversed, SourcePolicy::default()), Some("a-source"));
    }

    #[test]
    fn normalizing_merged_output_is_idempotent() {
        let samples = vec![
            sample(SleepStage::InBed, (0, 0), (7, 0), "watch"),
            sample(SleepStage::Core, (0, 30), (2, 0), "watch"),
            sample(SleepStage::Core, (1, 45), (2, 30), "watch"),
            sample(SleepStage::Deep, (2, 30), (3, 0), "watch"),
            sample(SleepStage::Awake, (3, 0), (3, 5), "watch"),
            sample(SleepStage::Core, (3, 5), (6, 0), "watch"),
            sample(SleepStage::Rem, (6, 0), (6, 40), "watch"),
        ];

        let once = normalize_night(&samples, SourcePolicy::default());
        let twice = normalize_night(&as_samples(&once, "watch"), SourcePolicy::default());

        assert_eq!(once, twice);
    }

    #[test]
    fn merged_segments_stay_within_input_coverage() {
        let samples = vec![
            sample(SleepStage::Core, (1, 0), (2, 0), "watch"),
            sample(SleepStage::Core, (1, 30), (2, 30), "watch"),
            sample(SleepStage::Rem, (4, 0), (5, 0), "watch"),
        ];

        for segment in normalize_night(&samples, SourcePolicy::default()) {
            let covered = samples.iter().filter(|s| s.stage == segment.stage).any(|s| {
                s.start_time <= segment.start_time && segment.start_time < s.end_time
            });
            let earliest = samples
                .iter()
                .filter(|s| s.stage == segment.stage)
                .map(|s| s.start_time)
                .min()
                .unwrap();
            let latest = samples
                .iter()
                .filter(|s| s.stage == segment.stage)
                .map(|s| s.end_time)
                .max()
                .unwrap();

            assert!(covered);
            assert!(segment.start_time >= earliest);
            assert!(segment.end_time <= latest);
        }
    }

    fn assert_non_overlapping(segments: &[MergedSegment]) {
        for pair in segments.windows(2) {
            assert!(
                pair[0].end_time <= pair[1].start_time,
                "overlap: {:?} / {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    fn segment(stage: SleepStage, start: (u32, u32), end: (u32, u32)) -> MergedSegment {
        MergedSegment {
            stage,
            start_time: at(start.0, start.1),
            end_time: at(end.0, end.1),
        }
    }

    #[test]
    fn stage_samples_inside_in_bed_produce_a_flat_timeline() {
        let samples = vec![
            sample(SleepStage::InBed, (0, 0), (7, 0), "watch"),
            sample(SleepStage::Core, (0, 30), (3, 0), "watch"),
            sample(SleepStage::Awake, (2, 0), (2, 10), "watch"),
            sample(SleepStage::Core, (2, 50), (6, 0), "watch"),
            sample(SleepStage::Deep, (5, 0), (5, 30), "watch"),
        ];

        let merged = normalize_night(&samples, SourcePolicy::default());

        assert_non_overlapping(&merged);
        assert_eq!(
            merged,
            vec![
                segment(SleepStage::InBed, (0, 0), (0, 30)),
                segment(SleepStage::Core, (0, 30), (2, 0)),
                segment(SleepStage::Awake, (2, 0), (2, 10)),
                segment(SleepStage::Core, (2, 10), (5, 0)),
                segment(SleepStage::Deep, (5, 0), (5, 30)),
                segment(SleepStage::Core, (5, 30), (6, 0)),
                segment(SleepStage::InBed, (6, 0), (7, 0)),
            ]
        );
    }

    #[test]
    fn nested_stage_does_not_cut_off_the_enclosing_run() {
        let samples = vec![
            sample(SleepStage::Core, (1, 0), (7, 0), "watch"),
            sample(SleepStage::Rem, (2, 0), (2, 30), "watch"),
        ];

        let merged = coalesce(&samples);

        assert_non_overlapping(&merged);
        assert_eq!(
            merged,
            vec![
                segment(SleepStage::Core, (1, 0), (2, 0)),
                segment(SleepStage::Rem, (2, 0), (2, 30)),
                segment(SleepStage::Core, (2, 30), (7, 0)),
            ]
        );
    }

    #[test]
    fn without_detailed_stages_the_sparser_source_wins() {
        let samples = vec![
            sample(SleepStage::Core, (0, 30), (3, 0), "ring"),
            sample(SleepStage::AsleepUnspecified, (3, 0), (6, 15), "ring"),
            sample(SleepStage::Core, (0, 45), (2, 0), "watch"),
            sample(SleepStage::Awake, (2, 0), (2, 10), "watch"),
            sample(SleepStage::Core, (2, 10), (7, 30), "watch"),
        ];

        assert_eq!(
            select_source(&samples, SourcePolicy::PreferDetailedStages),
            Some("ring")
        );

        let merged = normalize_night(&samples, SourcePolicy::PreferDetailedStages);
        assert_eq!(
            merged,
            vec![
                segment(SleepStage::Core, (0, 30), (3, 0)),
                segment(SleepStage::AsleepUnspecified, (3, 0), (6, 15)),
            ]
        );

        let window = NightWindow {
            start: Utc.with_ymd_and_hms(2026, 3, 9, 14, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap(),
        };
        assert_eq!(
            resolve_wake_time(&samples, &window, SourcePolicy::PreferDetailedStages),
            Some(at(6, 15))
        );
    }
}
