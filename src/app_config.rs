use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::content_filter::{ContentFilter, DEFAULT_WORDS};
use crate::errors::FilterError;
use crate::planner::{SegmentPlanner, DEFAULT_MIN_KEEP_GAP_SECS};
use crate::probe::DEFAULT_PROBE_TIMEOUT_SECS;
use crate::subtitle_processor::{MarkerSet, DEFAULT_IGNORE_MARKER, DEFAULT_REMOVE_MARKER};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Word list and inline markers
    #[serde(default)]
    pub filter: FilterConfig,

    /// Segment planner settings
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Output files and batch settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Content filter configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FilterConfig {
    // @field: Base word patterns
    #[serde(default = "default_words")]
    pub words: Vec<String>,

    // @field: Extra word patterns on top of the base list
    #[serde(default)]
    pub add_words: Vec<String>,

    // @field: Words never treated as a match
    #[serde(default)]
    pub ignore_words: Vec<String>,

    // @field: Inline marker that forces a cut
    #[serde(default = "default_remove_marker")]
    pub remove_marker: String,

    // @field: Inline marker that prevents a cut
    #[serde(default = "default_ignore_marker")]
    pub ignore_marker: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            words: default_words(),
            add_words: Vec::new(),
            ignore_words: Vec::new(),
            remove_marker: default_remove_marker(),
            ignore_marker: default_ignore_marker(),
        }
    }
}

impl FilterConfig {
    // @returns: Marker pair for the parser and planner
    pub fn markers(&self) -> MarkerSet {
        MarkerSet::new(self.remove_marker.clone(), self.ignore_marker.clone())
    }

    // @returns: Content filter built from the configured word lists
    pub fn build_filter(&self) -> Result<ContentFilter, FilterError> {
        ContentFilter::new(&self.words, &self.add_words, &self.ignore_words)
    }
}

/// Segment planner configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlannerConfig {
    /// Shortest clean gap, in whole seconds, worth keeping between two cuts
    #[serde(default = "default_min_keep_gap_secs")]
    pub min_keep_gap_secs: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_keep_gap_secs: default_min_keep_gap_secs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Suffix appended to the video stem for the clean subtitle file
    #[serde(default = "default_clean_suffix")]
    pub clean_suffix: String,

    /// Whether to append keep segments and flagged captions to `<stem>.log`
    #[serde(default = "default_true")]
    pub write_log: bool,

    /// Whether to replace an existing clean subtitle file
    #[serde(default)]
    pub force_overwrite: bool,

    /// Maximum number of videos processed at once
    #[serde(default = "default_concurrent_videos")]
    pub concurrent_videos: usize,

    /// Duration probe timeout in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            clean_suffix: default_clean_suffix(),
            write_log: true,
            force_overwrite: false,
            concurrent_videos: default_concurrent_videos(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_words() -> Vec<String> {
    DEFAULT_WORDS.iter().map(|w| w.to_string()).collect()
}

fn default_remove_marker() -> String {
    DEFAULT_REMOVE_MARKER.to_string()
}

fn default_ignore_marker() -> String {
    DEFAULT_IGNORE_MARKER.to_string()
}

fn default_min_keep_gap_secs() -> u64 {
    DEFAULT_MIN_KEEP_GAP_SECS
}

fn default_clean_suffix() -> String {
    "-clean".to_string()
}

fn default_true() -> bool {
    true
}

fn default_concurrent_videos() -> usize {
    2
}

fn default_probe_timeout_secs() -> u64 {
    DEFAULT_PROBE_TIMEOUT_SECS
}

impl Config {
    /// Load the configuration file, or write the defaults there if it does
    /// not exist yet. The result is validated either way.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str::<Config>(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            warn!("Config file not found at '{}', creating default config.", path.display());

            let config = Config::default();
            let config_json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize default config to JSON")?;

            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
                }
            }
            std::fs::write(path, config_json)
                .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

            config
        };

        config.validate().context("Configuration validation failed")?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.planner.min_keep_gap_secs == 0 {
            return Err(anyhow!("planner.min_keep_gap_secs must be at least 1"));
        }

        if self.output.concurrent_videos == 0 {
            return Err(anyhow!("output.concurrent_videos must be at least 1"));
        }

        if self.output.clean_suffix.trim().is_empty() {
            return Err(anyhow!("output.clean_suffix must not be empty"));
        }

        let remove = self.filter.remove_marker.trim();
        let ignore = self.filter.ignore_marker.trim();
        if remove.is_empty() || ignore.is_empty() {
            return Err(anyhow!("filter markers must not be empty"));
        }
        if remove == ignore {
            return Err(anyhow!("filter.remove_marker and filter.ignore_marker must differ (both '{}')", remove));
        }

        // Compiles every word pattern
        self.filter.build_filter()?;

        Ok(())
    }

    // @returns: Planner configured from this config
    pub fn build_planner(&self) -> SegmentPlanner {
        SegmentPlanner::new(self.planner.min_keep_gap_secs, self.filter.markers())
    }
}
