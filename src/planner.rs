/*!
 * Cut/keep segment planner and caption realigner.
 *
 * A single left-to-right pass over an ordered caption track. Flagged
 * captions become removed time, everything between them becomes keep
 * intervals, and clean captions are shifted back by the time removed before
 * them. The pass is a fold over caption order, so one track is never split
 * across threads; independent tracks can be planned concurrently.
 */

use log::{debug, info, warn};
use serde::Serialize;

use crate::content_filter::FlagPredicate;
use crate::errors::{PlanError, TimeError};
use crate::subtitle_processor::{Caption, MarkerSet};
use crate::timecode::{self, Seconds};

/// Shortest clean gap, in whole seconds, kept between two cuts
pub const DEFAULT_MIN_KEEP_GAP_SECS: u64 = 2;

/// Half-open range `[start, end)` of source media to keep, in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeepInterval {
    pub start: u64,
    pub end: u64,
}

impl KeepInterval {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn len_secs(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }
}

/// Result of planning one caption track
#[derive(Debug, Clone, PartialEq)]
pub struct CutPlan {
    /// Media ranges to keep, ordered and non-overlapping
    pub keep_intervals: Vec<KeepInterval>,

    /// Clean captions re-timed to the edited timeline, ids 1..N
    pub clean_captions: Vec<Caption>,

    /// Flagged captions with their original ids and times
    pub flagged_captions: Vec<Caption>,

    /// Seconds removed up to the last flagged caption
    pub total_removed: Seconds,

    /// Media duration the plan was made for
    pub duration: Seconds,
}

impl CutPlan {
    /// Whether the plan removes anything at all
    pub fn has_cuts(&self) -> bool {
        !self.flagged_captions.is_empty()
    }

    /// Flagged caption report, one caption per line
    pub fn flagged_report(&self) -> String {
        self.flagged_captions
            .iter()
            .map(|c| format!("{}\n", c.report_line()))
            .collect()
    }
}

// Accumulator for one planning pass
#[derive(Debug, Default)]
struct PlannerState {
    cursor: u64,
    total_removed: Seconds,
    keep_intervals: Vec<KeepInterval>,
    clean_captions: Vec<Caption>,
    flagged_captions: Vec<Caption>,
}

impl PlannerState {
    fn remove_secs(&mut self, secs: u64) {
        self.total_removed = timecode::add_seconds(self.total_removed, Seconds::from_whole_secs(secs));
    }
}

/// Segment planner settings
#[derive(Debug, Clone)]
pub struct SegmentPlanner {
    min_keep_gap_secs: u64,
    markers: MarkerSet,
}

impl Default for SegmentPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_KEEP_GAP_SECS, MarkerSet::default())
    }
}

impl SegmentPlanner {
    /// Create a planner. `markers` are stripped from the text of emitted
    /// clean captions.
    pub fn new(min_keep_gap_secs: u64, markers: MarkerSet) -> Self {
        Self {
            min_keep_gap_secs,
            markers,
        }
    }

    pub fn min_keep_gap_secs(&self) -> u64 {
        self.min_keep_gap_secs
    }

    /// Plan the cuts for one caption track.
    ///
    /// Fails without a partial result if the duration is unusable or any
    /// caption time cannot be parsed.
    pub fn plan<P: FlagPredicate + ?Sized>(
        &self,
        captions: &[Caption],
        predicate: &P,
        total_duration: f64,
    ) -> Result<CutPlan, PlanError> {
        let duration = validate_duration(total_duration)?;
        let duration_floor = total_duration.floor() as u64;

        let mut state = PlannerState::default();

        for (idx, caption) in captions.iter().enumerate() {
            let (start, end) = caption_times(idx + 1, caption)?;
            let start_floor = start.floor_secs().max(0) as u64;
            let mut end_ceil = end.ceil_secs().max(0) as u64;
            if end_ceil < start_floor {
                warn!("Caption {} ends before it starts ({} --> {})", idx + 1, caption.start, caption.end);
                end_ceil = start_floor;
            }

            if predicate.is_flagged(caption) {
                self.cut(&mut state, start_floor, end_ceil);
                debug!(
                    "Cut caption {} [{}s..{}s], cursor {}s, removed {}s",
                    idx + 1, start_floor, end_ceil, state.cursor, state.total_removed
                );
                state.flagged_captions.push(caption.clone());
            } else {
                let start_fix = timecode::sub_seconds(start, state.total_removed);
                let end_fix = timecode::sub_seconds(end, state.total_removed);
                state.clean_captions.push(Caption::from_seconds(
                    state.clean_captions.len() + 1,
                    start_fix,
                    end_fix,
                    self.markers.strip(&caption.text),
                ));
            }
        }

        if state.cursor < duration_floor {
            state.keep_intervals.push(KeepInterval::new(state.cursor, duration_floor));
        }

        info!(
            "Planned {} keep interval(s): {} caption(s) cut, {} kept, {}s removed",
            state.keep_intervals.len(),
            state.flagged_captions.len(),
            state.clean_captions.len(),
            state.total_removed
        );

        Ok(CutPlan {
            keep_intervals: state.keep_intervals,
            clean_captions: state.clean_captions,
            flagged_captions: state.flagged_captions,
            total_removed: state.total_removed,
            duration,
        })
    }

    // A flagged region at time zero has nothing before it to keep. A region
    // that starts less than the minimum gap after the cursor is merged into
    // the previous cut, short clean gap included, so the edit list never
    // holds micro-segments. Regions that begin before the cursor overlap an
    // earlier cut and are merged the same way.
    fn cut(&self, state: &mut PlannerState, start_floor: u64, end_ceil: u64) {
        if start_floor > 0 && start_floor >= state.cursor.saturating_add(self.min_keep_gap_secs) {
            state.keep_intervals.push(KeepInterval::new(state.cursor, start_floor));
            state.remove_secs(end_ceil - start_floor);
            state.cursor = end_ceil;
        } else {
            state.remove_secs(end_ceil.saturating_sub(state.cursor));
            state.cursor = state.cursor.max(end_ceil);
        }
    }
}

/// Plan with the default settings
pub fn plan_cuts<P: FlagPredicate + ?Sized>(
    captions: &[Caption],
    predicate: &P,
    total_duration: f64,
) -> Result<CutPlan, PlanError> {
    SegmentPlanner::default().plan(captions, predicate, total_duration)
}

fn validate_duration(total_duration: f64) -> Result<Seconds, PlanError> {
    if !total_duration.is_finite() || total_duration < 0.0 {
        return Err(PlanError::DurationError(format!(
            "expected a finite, non-negative number of seconds, got {}",
            total_duration
        )));
    }
    Seconds::from_secs_f64(total_duration)
        .ok_or_else(|| PlanError::DurationError(format!("{} seconds is out of range", total_duration)))
}

fn caption_times(caption_id: usize, caption: &Caption) -> Result<(Seconds, Seconds), PlanError> {
    let parse = |value: &str| {
        timecode::to_seconds(value)
            .and_then(|secs| {
                secs.ok_or_else(|| TimeError::ParseError {
                    timestamp: value.to_string(),
                    reason: "timestamp is missing".to_string(),
                })
            })
            .map_err(|source| PlanError::ParseError { caption_id, source })
    };

    Ok((parse(&caption.start)?, parse(&caption.end)?))
}
