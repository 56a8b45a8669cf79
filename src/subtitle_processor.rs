use std::fmt;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use log::{debug, warn};

use crate::errors::{SubtitleError, TimeError};
use crate::timecode::{self, Seconds};

// @module: Subtitle parsing and serialization

// @const: Marker that forces a caption to be cut
pub const DEFAULT_REMOVE_MARKER: &str = "!remove!";

// @const: Marker that protects a caption from being cut
pub const DEFAULT_IGNORE_MARKER: &str = "!ignore!";

// @const: Longest sequence number recognised as a block boundary
const MAX_SEQ_DIGITS: usize = 5;

/// Inline markup recognised in caption text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Annotations {
    // @field: Caption carries the force-remove marker
    pub force_remove: bool,

    // @field: Caption carries the force-ignore marker
    pub force_ignore: bool,
}

/// The two inline marker tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
    pub remove: String,
    pub ignore: String,
}

impl MarkerSet {
    pub fn new(remove: impl Into<String>, ignore: impl Into<String>) -> Self {
        Self {
            remove: remove.into(),
            ignore: ignore.into(),
        }
    }

    /// Detect markers in caption text
    pub fn annotate(&self, text: &str) -> Annotations {
        Annotations {
            force_remove: !self.remove.is_empty() && text.contains(&self.remove),
            force_ignore: !self.ignore.is_empty() && text.contains(&self.ignore),
        }
    }

    /// Caption text with both marker tokens removed.
    ///
    /// Text without a marker is returned unchanged. Otherwise each marker is
    /// dropped together with one space separating it from its neighbour, and
    /// nothing else in the text is touched.
    pub fn strip(&self, text: &str) -> String {
        let annotations = self.annotate(text);
        if !annotations.force_remove && !annotations.force_ignore {
            return text.to_string();
        }

        let mut stripped = text.to_string();
        for marker in [&self.remove, &self.ignore] {
            if marker.is_empty() {
                continue;
            }
            stripped = stripped
                .replace(&format!(" {}", marker), "")
                .replace(&format!("{} ", marker), "")
                .replace(marker.as_str(), "");
        }
        stripped.trim().to_string()
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::new(DEFAULT_REMOVE_MARKER, DEFAULT_IGNORE_MARKER)
    }
}

// @struct: Single caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    // @field: Positional id, 1-based
    pub id: usize,

    // @field: Start timestamp text
    pub start: String,

    // @field: End timestamp text
    pub end: String,

    // @field: Caption text, lines joined with '\n'
    pub text: String,

    // @field: Markers found in the text
    pub annotations: Annotations,
}

impl Caption {
    /// Creates a caption without annotations
    pub fn new(id: usize, start: impl Into<String>, end: impl Into<String>, text: impl Into<String>) -> Self {
        Caption {
            id,
            start: start.into(),
            end: end.into(),
            text: text.into(),
            annotations: Annotations::default(),
        }
    }

    /// Creates a caption from fixed-point times
    pub fn from_seconds(id: usize, start: Seconds, end: Seconds, text: impl Into<String>) -> Self {
        Self::new(id, timecode::to_timestamp(start), timecode::to_timestamp(end), text)
    }

    // @returns: Start time, `None` when the timestamp is blank
    pub fn start_seconds(&self) -> Result<Option<Seconds>, TimeError> {
        timecode::to_seconds(&self.start)
    }

    // @returns: End time, `None` when the timestamp is blank
    pub fn end_seconds(&self) -> Result<Option<Seconds>, TimeError> {
        timecode::to_seconds(&self.end)
    }

    /// One report line: `start - end \ttext on one line`
    pub fn report_line(&self) -> String {
        format!("{} - {} \t{}", self.start, self.end, self.text.trim().replace('\n', " "))
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.id)?;
        writeln!(f, "{} --> {}", self.start, self.end)?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// A parsed subtitle track with the file it came from
#[derive(Debug)]
pub struct CaptionTrack {
    /// Source filename
    pub source_file: PathBuf,

    /// Ordered captions
    pub captions: Vec<Caption>,
}

impl CaptionTrack {
    /// Create a new, empty track
    pub fn new(source_file: PathBuf) -> Self {
        CaptionTrack {
            source_file,
            captions: Vec::new(),
        }
    }

    /// Read and parse an SRT file
    pub fn from_srt_file<P: AsRef<Path>>(path: P, markers: &MarkerSet) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let captions = parse_srt_file(path, markers)?;
        Ok(CaptionTrack {
            source_file: path.to_path_buf(),
            captions,
        })
    }

    /// Write captions to an SRT file, renumbering ids 1..N
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_srt_file(path, &self.captions)
    }
}

impl fmt::Display for CaptionTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Caption Track")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Captions: {}", self.captions.len())?;
        Ok(())
    }
}

/// Parse an SRT file into captions.
///
/// Read failures are reported as format errors naming the file, so the caller
/// sees the same remediation hint either way.
pub fn parse_srt_file(path: &Path, markers: &MarkerSet) -> Result<Vec<Caption>, SubtitleError> {
    let label = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| SubtitleError::FormatError {
        file: label.clone(),
        reason: format!("cannot read file: {}", e),
    })?;
    parse_srt_with_source(&content, &label, markers)
}

/// Parse SRT text with the default markers
pub fn parse_srt_string(content: &str) -> Result<Vec<Caption>, SubtitleError> {
    parse_srt_with_source(content, "<inline>", &MarkerSet::default())
}

/// Parse SRT text into captions.
///
/// A block ends at a blank line followed by a line holding only a 1-5 digit
/// sequence number. The sequence number only marks the boundary: ids are
/// assigned by position because source numbering may be missing, duplicated
/// or out of order. A blank line followed by a bare number inside caption
/// text is indistinguishable from a boundary and will split that caption.
pub fn parse_srt_with_source(content: &str, source: &str, markers: &MarkerSet) -> Result<Vec<Caption>, SubtitleError> {
    let format_error = |reason: String| SubtitleError::FormatError {
        file: source.to_string(),
        reason,
    };

    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let blocks = split_blocks(content);
    if blocks.is_empty() {
        return Err(format_error("no subtitle blocks found".to_string()));
    }

    let mut captions = Vec::with_capacity(blocks.len());
    for (idx, block) in blocks.iter().enumerate() {
        let mut lines = block.iter().copied();

        // The first block still carries its leading sequence line
        if idx == 0 {
            lines.next();
        }

        let time_line = lines.next().unwrap_or_default();
        let (start, end) = split_time_range(time_line).ok_or_else(|| {
            format_error(format!(
                "block {} has no '<start> --> <end>' line (found '{}')",
                idx + 1,
                time_line.trim()
            ))
        })?;

        let text = lines.collect::<Vec<_>>().join("\n").trim().to_string();
        if text.is_empty() {
            debug!("Caption {} in {} has no text", idx + 1, source);
        }

        let annotations = markers.annotate(&text);
        captions.push(Caption {
            id: idx + 1,
            start,
            end,
            text,
            annotations,
        });
    }

    let unordered = captions
        .windows(2)
        .filter(|pair| match (pair[0].start_seconds(), pair[1].start_seconds()) {
            (Ok(Some(a)), Ok(Some(b))) => b < a,
            _ => false,
        })
        .count();
    if unordered > 0 {
        warn!("{} caption(s) in {} start before the caption preceding them", unordered, source);
    }

    Ok(captions)
}

/// Render captions as SRT text, renumbering ids 1..N
pub fn serialize(captions: &[Caption]) -> String {
    let mut output = String::new();
    for (idx, caption) in captions.iter().enumerate() {
        output.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            idx + 1,
            caption.start,
            caption.end,
            caption.text
        ));
    }
    output
}

/// Write captions to an SRT file, creating parent directories as needed
pub fn write_srt_file<P: AsRef<Path>>(path: P, captions: &[Caption]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let mut file = File::create(path)
        .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;
    file.write_all(serialize(captions).as_bytes())
        .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

    Ok(())
}

// Groups lines into blocks, dropping each boundary's sequence line.
// Leading and trailing blank lines are not part of any block.
fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let lines: Vec<&str> = content.lines().collect();
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let after_blank = i > 0 && lines[i - 1].trim().is_empty();
        if after_blank && is_sequence_line(line) && current.iter().any(|l| !l.trim().is_empty()) {
            blocks.push(trim_blank_edges(std::mem::take(&mut current)));
            continue;
        }
        current.push(line);
    }

    let last = trim_blank_edges(current);
    if !last.is_empty() {
        blocks.push(last);
    }
    blocks
}

fn trim_blank_edges(mut block: Vec<&str>) -> Vec<&str> {
    while block.last().is_some_and(|l| l.trim().is_empty()) {
        block.pop();
    }
    let leading = block.iter().take_while(|l| l.trim().is_empty()).count();
    block.drain(..leading);
    block
}

fn is_sequence_line(line: &str) -> bool {
    let line = line.trim_end();
    (1..=MAX_SEQ_DIGITS).contains(&line.len()) && line.bytes().all(|b| b.is_ascii_digit())
}

// Splits "00:00:01,000 --> 00:00:02,000" and drops trailing position hints.
fn split_time_range(line: &str) -> Option<(String, String)> {
    let (start, end) = line.split_once("-->")?;
    let start = start.trim();
    let end = end.split_whitespace().next().unwrap_or_default();
    if start.is_empty() || end.is_empty() {
        return None;
    }
    Some((start.to_string(), end.to_string()))
}
