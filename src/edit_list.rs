/*!
 * Edit list rendering for keep intervals.
 *
 * The encoder consumes keep intervals in one of two shapes: a trim/concat
 * filter graph, or a `between(t,a,b)` select expression for frame-level
 * filtering. Both are plain strings built from whole-second intervals; no
 * codec or encoder settings live here.
 */

use std::fmt::Write;

use crate::planner::KeepInterval;
use crate::timecode::{self, Seconds};

/// Keep intervals ready to hand to an encoder
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditList {
    intervals: Vec<KeepInterval>,
}

impl EditList {
    pub fn from_intervals(intervals: &[KeepInterval]) -> Self {
        Self {
            intervals: intervals.to_vec(),
        }
    }

    pub fn intervals(&self) -> &[KeepInterval] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Total seconds of media kept
    pub fn kept_seconds(&self) -> u64 {
        self.intervals.iter().map(KeepInterval::len_secs).sum()
    }

    /// Seconds of a `duration` long source that the edit drops
    pub fn removed_seconds(&self, duration: Seconds) -> Seconds {
        timecode::sub_seconds_signed(duration, Seconds::from_whole_secs(self.kept_seconds()))
    }

    /// Trim/concat filter graph over video stream 0 and the given audio
    /// track, producing `[outv]` and `[outa]`. `None` when nothing is kept.
    pub fn filter_complex(&self, audio_track: usize) -> Option<String> {
        if self.intervals.is_empty() {
            return None;
        }

        let mut cuts = String::new();
        let mut pairs = String::new();
        for (i, interval) in self.intervals.iter().enumerate() {
            let _ = write!(
                cuts,
                "[0:v]trim=start={s}:end={e},setpts=PTS-STARTPTS[{i}v];\
                 [0:a:{a}]atrim=start={s}:end={e},asetpts=PTS-STARTPTS[{i}a];",
                s = interval.start,
                e = interval.end,
                i = i,
                a = audio_track,
            );
            let _ = write!(pairs, "[{i}v][{i}a]", i = i);
        }

        Some(format!(
            "{}{} concat=n={}:v=1:a=1[outv][outa]",
            cuts,
            pairs,
            self.intervals.len()
        ))
    }

    /// `between(t,a,b)+...` expression for select/aselect filters.
    /// `None` when nothing is kept.
    pub fn select_expression(&self) -> Option<String> {
        if self.intervals.is_empty() {
            return None;
        }

        Some(
            self.intervals
                .iter()
                .map(|iv| format!("between(t,{},{})", iv.start, iv.end))
                .collect::<Vec<_>>()
                .join("+"),
        )
    }
}
