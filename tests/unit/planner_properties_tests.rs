/*!
 * Property tests for the segment planner
 */

use cleancut::planner::{plan_cuts, KeepInterval, SegmentPlanner};
use cleancut::subtitle_processor::{Caption, MarkerSet};
use cleancut::timecode::{self, Seconds};
use proptest::prelude::*;

fn is_flagged(caption: &Caption) -> bool {
    caption.text == "flagged"
}

// Builds an ordered, non-overlapping track from (gap, length, flagged) triples
fn build_track(layout: &[(i64, i64, bool)]) -> (Vec<Caption>, i64) {
    let mut cursor = 0;
    let mut captions = Vec::new();
    for (idx, (gap, len, flagged)) in layout.iter().enumerate() {
        let start = cursor + gap;
        let end = start + len;
        let text = if *flagged { "flagged" } else { "clean" };
        captions.push(Caption::from_seconds(
            idx + 1,
            Seconds::from_millis(start),
            Seconds::from_millis(end),
            text,
        ));
        cursor = end;
    }
    (captions, cursor)
}

fn track_strategy() -> impl Strategy<Value = (Vec<(i64, i64, bool)>, i64)> {
    (
        prop::collection::vec((0i64..6_000, 1i64..4_000, any::<bool>()), 0..40),
        0i64..10_000,
    )
}

fn assert_well_formed(intervals: &[KeepInterval], duration_floor: u64) {
    for interval in intervals {
        assert!(interval.start < interval.end, "empty or inverted {:?}", interval);
        assert!(interval.end <= duration_floor, "{:?} past {}", interval, duration_floor);
    }
    for pair in intervals.windows(2) {
        assert!(pair[0].end <= pair[1].start, "overlap {:?}", pair);
    }
}

proptest! {
    #[test]
    fn test_plan_withAnyTrack_shouldProduceOrderedDisjointIntervals((layout, tail) in track_strategy()) {
        let (captions, last_end) = build_track(&layout);
        let duration = (last_end + tail) as f64 / 1000.0;

        let plan = plan_cuts(&captions, &is_flagged, duration).unwrap();

        assert_well_formed(&plan.keep_intervals, duration.floor() as u64);
        prop_assert_eq!(plan.clean_captions.len() + plan.flagged_captions.len(), captions.len());
    }

    #[test]
    fn test_plan_withAnyTrack_shouldNumberCleanCaptionsSequentially((layout, tail) in track_strategy()) {
        let (captions, last_end) = build_track(&layout);
        let duration = (last_end + tail) as f64 / 1000.0;

        let plan = plan_cuts(&captions, &is_flagged, duration).unwrap();

        for (idx, caption) in plan.clean_captions.iter().enumerate() {
            prop_assert_eq!(caption.id, idx + 1);
        }
        for flagged in &plan.flagged_captions {
            prop_assert_eq!(&captions[flagged.id - 1], flagged);
        }
    }

    #[test]
    fn test_plan_withNoFlaggedCaptions_shouldKeepEverything(
        layout in prop::collection::vec((0i64..6_000, 1i64..4_000), 0..40),
        tail in 1_000i64..10_000,
    ) {
        let layout: Vec<(i64, i64, bool)> = layout.into_iter().map(|(g, l)| (g, l, false)).collect();
        let (captions, last_end) = build_track(&layout);
        let duration = (last_end + tail) as f64 / 1000.0;

        let plan = plan_cuts(&captions, &is_flagged, duration).unwrap();

        prop_assert_eq!(plan.keep_intervals, vec![KeepInterval::new(0, duration.floor() as u64)]);
        prop_assert_eq!(plan.clean_captions, captions);
        prop_assert_eq!(plan.total_removed, Seconds::ZERO);
    }

    #[test]
    fn test_plan_withAnyGap_shouldKeepIntervalsAtLeastGapApartFromCuts(
        (layout, tail) in track_strategy(),
        gap in 1u64..6,
    ) {
        let (captions, last_end) = build_track(&layout);
        let duration = (last_end + tail) as f64 / 1000.0;
        let planner = SegmentPlanner::new(gap, MarkerSet::default());

        let plan = planner.plan(&captions, &is_flagged, duration).unwrap();

        assert_well_formed(&plan.keep_intervals, duration.floor() as u64);
        // Every interval closed by a cut spans at least the minimum gap
        let closed_by_cut = plan.keep_intervals.len().saturating_sub(1);
        for interval in plan.keep_intervals.iter().take(closed_by_cut) {
            prop_assert!(interval.len_secs() >= gap);
        }
    }
}

/// Test that flagged captions stacked at time zero leave only the tail
#[test]
fn test_plan_withAllFlaggedFromZero_shouldKeepAtMostTail() {
    let captions = vec![
        Caption::new(1, "00:00:00,000", "00:00:01,500", "flagged"),
        Caption::new(2, "00:00:00,000", "00:00:03,200", "flagged"),
        Caption::new(3, "00:00:00,000", "00:00:00,800", "flagged"),
    ];

    let plan = plan_cuts(&captions, &is_flagged, 10.0).unwrap();

    assert_eq!(plan.keep_intervals, vec![KeepInterval::new(4, 10)]);
    assert_eq!(plan.total_removed, Seconds::from_millis(4_000));
    assert!(plan.clean_captions.is_empty());
    assert_eq!(plan.flagged_captions.len(), 3);
}

/// Test that a track flagged from start to finish keeps nothing
#[test]
fn test_plan_withAllFlaggedCoveringMedia_shouldKeepNothing() {
    let captions = vec![
        Caption::new(1, "00:00:00,000", "00:00:04,000", "flagged"),
        Caption::new(2, "00:00:00,000", "00:00:09,500", "flagged"),
    ];

    let plan = plan_cuts(&captions, &is_flagged, 9.5).unwrap();

    assert!(plan.keep_intervals.is_empty());
    assert!(plan.clean_captions.is_empty());
}

/// Test re-timing of clean captions after a merged cut
#[test]
fn test_plan_withMergedCut_shouldShiftByAccumulatedRemoval() {
    let captions = vec![
        Caption::new(1, "00:00:00,000", "00:00:01,500", "flagged"),
        Caption::new(2, "00:00:01,800", "00:00:03,000", "clean"),
        Caption::new(3, "00:00:04,000", "00:00:05,000", "flagged"),
        Caption::new(4, "00:00:09,000", "00:00:10,000", "clean"),
    ];

    let plan = plan_cuts(&captions, &is_flagged, 12.0).unwrap();

    // cursor reaches 2 after the first cut; the second starts at 4, exactly
    // the minimum gap, so (2, 4) is kept
    assert_eq!(plan.keep_intervals, vec![KeepInterval::new(2, 4), KeepInterval::new(5, 12)]);
    assert_eq!(plan.total_removed, Seconds::from_millis(3_000));
    let removed_before_last = Seconds::from_millis(3_000);
    assert_eq!(
        plan.clean_captions[1].start,
        timecode::to_timestamp(timecode::sub_seconds(Seconds::from_millis(9_000), removed_before_last))
    );
    assert_eq!(plan.clean_captions[1].start, "00:00:06,000");
}
