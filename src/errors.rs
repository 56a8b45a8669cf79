/*!
 * Error types for the cleancut library.
 *
 * This module contains custom error types for the different stages of
 * planning a cut, using the thiserror crate for ergonomic error definitions.
 * Every error here is terminal for the video being processed.
 */

use thiserror::Error;

/// Remediation shown with every subtitle format failure
pub const FORMAT_HINT: &str = "the file may have a corrupted byte-order mark or a leading blank line; \
re-save the subtitle file as plain UTF-8 and try again";

/// Errors that can occur while reading or parsing a subtitle document
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Malformed header or block structure
    #[error("Invalid subtitle file {file}: {reason} ({hint})", hint = FORMAT_HINT)]
    FormatError {
        /// File (or source label) being parsed
        file: String,
        /// What was wrong
        reason: String,
    },
}

/// Errors that can occur when converting timestamps
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimeError {
    /// A timestamp component could not be parsed
    #[error("Failed to parse timestamp '{timestamp}': {reason}")]
    ParseError {
        /// Offending timestamp text
        timestamp: String,
        /// What was wrong
        reason: String,
    },
}

/// Errors that can occur while planning cuts for one subtitle track
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// A caption time could not be parsed
    #[error("Caption {caption_id}: {source}")]
    ParseError {
        /// Positional id of the offending caption
        caption_id: usize,
        /// Underlying timestamp error
        #[source]
        source: TimeError,
    },

    /// The media duration was missing, negative or not finite
    #[error("Invalid media duration: {0}")]
    DurationError(String),
}

/// Errors that can occur when building the content filter
#[derive(Error, Debug)]
pub enum FilterError {
    /// A word list entry is not a valid pattern
    #[error("Invalid word pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Offending word list entry
        pattern: String,
        /// Regex compiler message
        reason: String,
    },
}

/// Errors that can occur when probing media duration
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The probe command could not run or exited unsuccessfully
    #[error("Duration probe failed for {file}: {message}")]
    CommandFailed {
        /// Probed media file
        file: String,
        /// stderr or spawn error
        message: String,
    },

    /// The probe command did not finish in time
    #[error("Duration probe timed out after {secs}s for {file}")]
    Timeout {
        /// Probed media file
        file: String,
        /// Timeout that elapsed
        secs: u64,
    },

    /// The probe output was not a usable duration
    #[error("Duration probe returned an invalid value for {file}: '{output}'")]
    InvalidOutput {
        /// Probed media file
        file: String,
        /// Raw output
        output: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle parsing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from planning
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Error from the content filter
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// Error from the duration probe
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
