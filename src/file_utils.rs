use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use std::fs::OpenOptions;
use std::io::Write;
use chrono::Local;

// @module: File and directory utilities

// @const: Video extensions picked up by folder discovery
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "webm"];

// @const: Stem endings of files this tool or its encoder produced
pub const GENERATED_STEM_SUFFIXES: &[&str] = &["output", "clean", "temp", "sanitize"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Sibling path `<stem><suffix>.<extension>` next to the video
    pub fn sibling_path<P: AsRef<Path>>(video: P, suffix: &str, extension: &str) -> PathBuf {
        let video = video.as_ref();
        let stem = video.file_stem().unwrap_or_default();

        let mut filename = stem.to_string_lossy().to_string();
        filename.push_str(suffix);
        filename.push('.');
        filename.push_str(extension);

        video.with_file_name(filename)
    }

    // @returns: Sidecar subtitle for a video, `<stem>.srt`
    pub fn subtitle_path<P: AsRef<Path>>(video: P) -> PathBuf {
        Self::sibling_path(video, "", "srt")
    }

    // @returns: Clean subtitle output, `<stem><suffix>.srt`
    pub fn clean_subtitle_path<P: AsRef<Path>>(video: P, suffix: &str) -> PathBuf {
        Self::sibling_path(video, suffix, "srt")
    }

    // @returns: Per-video log file, `<stem>.log`
    pub fn log_path<P: AsRef<Path>>(video: P) -> PathBuf {
        Self::sibling_path(video, "", "log")
    }

    /// Find the videos directly inside a directory, skipping files this tool
    /// or its encoder generated. Results are sorted by path.
    pub fn find_videos<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !Self::dir_exists(dir) {
            return Err(anyhow::anyhow!("Directory does not exist: {:?}", dir));
        }

        let mut result = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::detect_file_type(path) == FileType::Video && !Self::is_generated(path) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    // @checks: Stem ends with one of the generated-output suffixes
    pub fn is_generated<P: AsRef<Path>>(path: P) -> bool {
        let stem = path
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        GENERATED_STEM_SUFFIXES.iter().any(|suffix| stem.ends_with(suffix))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        // Open file in append mode, create if it doesn't exist
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Classify a path by its extension
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        let Some(ext) = path.as_ref().extension() else {
            return FileType::Unknown;
        };
        let ext = ext.to_string_lossy().to_lowercase();

        if ext == "srt" {
            FileType::Subtitle
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            FileType::Video
        } else {
            FileType::Unknown
        }
    }
}

/// Enum representing different file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Subtitle file (SRT)
    Subtitle,
    /// Video file the folder scan picks up
    Video,
    /// Unknown file type
    Unknown,
}
