/*!
 * Media duration probing.
 *
 * The planner needs the total duration of the source media to close the
 * final keep interval. `DurationProbe` is the seam the controller calls;
 * `FfprobeDurationProbe` is the production implementation backed by the
 * ffprobe command line tool.
 */

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use tokio::process::Command;

use crate::errors::ProbeError;

// @const: Default probe timeout in seconds
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 60;

/// Reports the duration of a media file in seconds
#[async_trait]
pub trait DurationProbe: Send + Sync {
    async fn probe_duration(&self, video: &Path) -> Result<f64, ProbeError>;
}

/// Duration probe backed by `ffprobe`
#[derive(Debug, Clone)]
pub struct FfprobeDurationProbe {
    // @field: Executable name or path
    program: String,

    // @field: Upper bound on one probe call
    timeout: Duration,
}

impl Default for FfprobeDurationProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT_SECS)
    }
}

impl FfprobeDurationProbe {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            program: "ffprobe".to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Use a different ffprobe executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    // @returns: ffprobe arguments for the given file
    fn probe_args(video: &Path) -> Vec<String> {
        // MKV containers do not store a per-stream duration
        let entry = if is_matroska(video) {
            "format=duration"
        } else {
            "stream=duration"
        };

        vec![
            "-v".to_string(),
            "error".to_string(),
            "-show_entries".to_string(),
            entry.to_string(),
            "-of".to_string(),
            "default=noprint_wrappers=1:nokey=1".to_string(),
            "-select_streams".to_string(),
            "v:0".to_string(),
            video.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl DurationProbe for FfprobeDurationProbe {
    async fn probe_duration(&self, video: &Path) -> Result<f64, ProbeError> {
        let file = video.display().to_string();

        let mut command = Command::new(&self.program);
        command.args(Self::probe_args(video)).kill_on_drop(true);
        let ffprobe_future = command.output();

        let output = tokio::select! {
            result = ffprobe_future => {
                result.map_err(|e| ProbeError::CommandFailed {
                    file: file.clone(),
                    message: format!("failed to execute {}: {}", self.program, e),
                })?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(ProbeError::Timeout {
                    file,
                    secs: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffprobe failed for {}: {}", file, stderr.trim());
            return Err(ProbeError::CommandFailed {
                file,
                message: stderr.trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let duration = parse_duration_output(&file, &stdout)?;
        debug!("Video length for {}: {}s", file, duration);
        Ok(duration)
    }
}

/// Parse the duration printed by ffprobe.
///
/// Only the first non-empty line is read; ffprobe prints one value per
/// selected stream.
pub fn parse_duration_output(file: &str, output: &str) -> Result<f64, ProbeError> {
    let invalid = || ProbeError::InvalidOutput {
        file: file.to_string(),
        output: output.trim().to_string(),
    };

    let line = output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(invalid)?;

    match line.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(invalid()),
    }
}

fn is_matroska(video: &Path) -> bool {
    video
        .extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("mkv"))
}
