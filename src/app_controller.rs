use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::content_filter::ContentFilter;
use crate::edit_list::EditList;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::planner::{CutPlan, SegmentPlanner};
use crate::probe::{DurationProbe, FfprobeDurationProbe};
use crate::subtitle_processor::{self, CaptionTrack, MarkerSet};

// @module: Application controller for cutting videos by their subtitles

/// What happened to one video
#[derive(Debug, Clone, PartialEq)]
pub enum VideoStatus {
    /// Planned and clean subtitle written
    Planned(CutPlan),
    /// Clean subtitle already existed and overwriting is off
    Skipped,
}

/// Result of processing one video
#[derive(Debug, Clone, PartialEq)]
pub struct VideoOutcome {
    // @field: Source video
    pub video: PathBuf,

    // @field: Clean subtitle path, written or pre-existing
    pub clean_subtitle: PathBuf,

    // @field: Planning result
    pub status: VideoStatus,
}

impl VideoOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, VideoStatus::Skipped)
    }

    // @returns: Plan, unless the video was skipped
    pub fn plan(&self) -> Option<&CutPlan> {
        match &self.status {
            VideoStatus::Planned(plan) => Some(plan),
            VideoStatus::Skipped => None,
        }
    }

    // @returns: Edit list for the encoder, unless the video was skipped
    pub fn edit_list(&self) -> Option<EditList> {
        self.plan().map(|plan| EditList::from_intervals(&plan.keep_intervals))
    }
}

/// Per-video results of a folder run, in path order
pub type FolderResults = Vec<(PathBuf, Result<VideoOutcome, AppError>)>;

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Flag predicate built from the word lists
    filter: ContentFilter,

    // @field: Planner built from the planner settings
    planner: SegmentPlanner,

    // @field: Marker pair used by the parser
    markers: MarkerSet,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let filter = config.filter.build_filter()?;
        let planner = config.build_planner();
        let markers = config.filter.markers();

        Ok(Self {
            config,
            filter,
            planner,
            markers,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // @returns: ffprobe-backed probe bounded by `output.probe_timeout_secs`
    pub fn duration_probe(&self) -> FfprobeDurationProbe {
        FfprobeDurationProbe::new(self.config.output.probe_timeout_secs)
    }

    /// Process a folder, probing durations with ffprobe
    pub async fn run(&self, dir: &Path) -> Result<FolderResults> {
        let probe = self.duration_probe();
        self.run_folder(dir, &probe).await
    }

    /// Plan cuts for one video from its sidecar `<stem>.srt`.
    ///
    /// Writes the re-timed clean subtitle next to the video and, when enabled,
    /// appends the keep segments and flagged captions to `<stem>.log`.
    pub async fn process_video(&self, video: &Path, probe: &dyn DurationProbe) -> Result<VideoOutcome, AppError> {
        let subtitle_path = FileManager::subtitle_path(video);
        let clean_path = FileManager::clean_subtitle_path(video, &self.config.output.clean_suffix);

        if !FileManager::file_exists(&subtitle_path) {
            return Err(AppError::File(format!(
                "No subtitle file for {}: expected {}",
                video.display(),
                subtitle_path.display()
            )));
        }

        if FileManager::file_exists(&clean_path) && !self.config.output.force_overwrite {
            warn!("Skipping {}, clean subtitle already exists (enable force_overwrite to replace it)", video.display());
            return Ok(VideoOutcome {
                video: video.to_path_buf(),
                clean_subtitle: clean_path,
                status: VideoStatus::Skipped,
            });
        }

        let track = CaptionTrack::from_srt_file(&subtitle_path, &self.markers)?;
        debug!("{}", track);

        let duration = probe.probe_duration(video).await?;
        let plan = self.planner.plan(&track.captions, &self.filter, duration)?;

        subtitle_processor::write_srt_file(&clean_path, &plan.clean_captions)?;

        if self.config.output.write_log {
            self.write_plan_log(video, &plan)?;
        }

        info!("Success: {}", clean_path.display());

        Ok(VideoOutcome {
            video: video.to_path_buf(),
            clean_subtitle: clean_path,
            status: VideoStatus::Planned(plan),
        })
    }

    /// Process every video directly inside `dir`.
    ///
    /// Videos run concurrently up to `output.concurrent_videos`. A failing
    /// video is logged and does not stop the others.
    pub async fn run_folder(&self, dir: &Path, probe: &dyn DurationProbe) -> Result<FolderResults> {
        let start_time = std::time::Instant::now();

        let videos = FileManager::find_videos(dir)?;
        if videos.is_empty() {
            return Err(anyhow::anyhow!("No video files found in directory: {:?}", dir));
        }

        let folder_pb = ProgressBar::new(videos.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} videos ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Planning cuts");

        let mut results: FolderResults = stream::iter(videos)
            .map(|video| {
                let pb = folder_pb.clone();
                async move {
                    let result = self.process_video(&video, probe).await;
                    if let Err(e) = &result {
                        error!("Error processing file {}: {}", video.display(), e);
                    }
                    pb.inc(1);
                    (video, result)
                }
            })
            .buffer_unordered(self.config.output.concurrent_videos)
            .collect()
            .await;

        folder_pb.finish_with_message("Folder processing complete");

        results.sort_by(|a, b| a.0.cmp(&b.0));

        let skip_count = results.iter().filter(|(_, r)| matches!(r, Ok(o) if o.is_skipped())).count();
        let error_count = results.iter().filter(|(_, r)| r.is_err()).count();
        let success_count = results.len() - skip_count - error_count;
        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors in {}",
            success_count,
            skip_count,
            error_count,
            Self::format_duration(start_time.elapsed())
        );

        Ok(results)
    }

    fn write_plan_log(&self, video: &Path, plan: &CutPlan) -> Result<()> {
        let log_path = FileManager::log_path(video);

        let keeps = serde_json::to_string(&plan.keep_intervals)
            .context("Failed to serialize keep intervals")?;
        FileManager::append_to_log_file(
            &log_path,
            &format!(
                "{}: duration {}s, removed {}s, keep segments {}",
                video.display(),
                plan.duration,
                plan.total_removed,
                keeps
            ),
        )?;

        if plan.has_cuts() {
            FileManager::append_to_log_file(
                &log_path,
                &format!("Flagged captions ({}):\n{}", plan.flagged_captions.len(), plan.flagged_report()),
            )?;
        }

        Ok(())
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
