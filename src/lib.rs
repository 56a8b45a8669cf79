/*!
 * # cleancut - subtitle-driven video cut planner
 *
 * A Rust library that reads a video's SubRip subtitles, flags captions whose
 * text matches a word list or carries an inline marker, and plans the media
 * ranges to keep so an encoder can cut the flagged speech out.
 *
 * ## Features
 *
 * - Parse and serialize SubRip (`.srt`) captions, CRLF or LF, BOM tolerant
 * - Exact millisecond time arithmetic for `HH:MM:SS,mmm` timestamps
 * - Configurable word list with added and ignored words
 * - Inline `!remove!` / `!ignore!` markers to force a decision
 * - Keep-interval planning with short-gap merging
 * - Re-timed clean subtitles for the edited video
 * - ffmpeg trim/concat filter graphs and select expressions
 * - Folder processing with bounded concurrency
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timecode`: Fixed-point time values and timestamp conversion
 * - `subtitle_processor`: Subtitle file parsing and serialization
 * - `content_filter`: Word-list flag predicate
 * - `planner`: Cut/keep segment planner and caption realigner
 * - `edit_list`: Encoder-facing rendering of keep intervals
 * - `probe`: Media duration probing
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Per-video and folder workflows
 * - `logging`: Terminal logger
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod content_filter;
pub mod edit_list;
pub mod errors;
pub mod file_utils;
pub mod logging;
pub mod planner;
pub mod probe;
pub mod subtitle_processor;
pub mod timecode;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, VideoOutcome, VideoStatus};
pub use content_filter::{ContentFilter, FlagPredicate};
pub use edit_list::EditList;
pub use errors::{AppError, FilterError, PlanError, ProbeError, SubtitleError, TimeError};
pub use planner::{plan_cuts, CutPlan, KeepInterval, SegmentPlanner};
pub use probe::{DurationProbe, FfprobeDurationProbe};
pub use subtitle_processor::{Caption, CaptionTrack, MarkerSet};
pub use timecode::Seconds;
