use std::fmt;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use log::{debug, warn};

use crate::errors::FormatError;
use crate::timecode::parse_timecode;

// @module: Subtitle track parsing

// @const: Token between start and end timecode
const TIMECODE_SEPARATOR: &str = " --> ";

// @const: Blank line between entries
const ENTRY_SEPARATOR: &str = "\n\n";

/// Start and end of a cue, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSpan {
    pub start_seconds: f64,
    pub end_seconds: f64,
}

impl TimeSpan {
    pub fn new(start_seconds: f64, end_seconds: f64) -> Self {
        TimeSpan { start_seconds, end_seconds }
    }

    /// Spoken duration of the cue
    pub fn duration(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Cue timing
    pub span: TimeSpan,

    // @field: Cue text, lines joined with '\n'
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry - used by tests and external consumers
    pub fn new(start_seconds: f64, end_seconds: f64, text: impl Into<String>) -> Self {
        SubtitleEntry {
            span: TimeSpan::new(start_seconds, end_seconds),
            text: text.into(),
        }
    }

    pub fn start_seconds(&self) -> f64 {
        self.span.start_seconds
    }

    pub fn duration(&self) -> f64 {
        self.span.duration()
    }
}

/// Parse a whole SRT track into entries.
///
/// Entries are separated by a blank line. Within an entry the first line
/// (the index) is ignored, the second line must be `start --> end`, and all
/// remaining lines form the text. The first malformed entry aborts the parse.
///
/// `\r\n` line endings are accepted, and whitespace-only input yields no entries.
pub fn parse_entries(block_text: &str) -> Result<Vec<SubtitleEntry>, FormatError> {
    let normalized = block_text.replace("\r\n", "\n");
    let content = normalized.trim();
    if content.is_empty() {
        return Ok(Vec::new());
    }

    let entries = content
        .split(ENTRY_SEPARATOR)
        .map(|block| block.trim_matches('\n'))
        .filter(|block| !block.trim().is_empty())
        .enumerate()
        .map(|(i, block)| parse_entry(i + 1, block))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Parsed {} subtitle entries", entries.len());
    Ok(entries)
}

// @param position: 1-based entry position, for error reporting
fn parse_entry(position: usize, block: &str) -> Result<SubtitleEntry, FormatError> {
    let lines: Vec<&str> = block.split('\n').collect();
    if lines.len() < 3 {
        return Err(FormatError::MalformedEntry {
            position,
            line_count: lines.len(),
        });
    }

    let timecode_line = lines[1];
    let (start, end) = timecode_line
        .split_once(TIMECODE_SEPARATOR)
        .ok_or_else(|| FormatError::MissingTimecodeSeparator {
            position,
            line: timecode_line.to_string(),
        })?;

    let start_seconds = parse_timecode(start)?;
    let end_seconds = parse_timecode(end)?;
    if end_seconds < start_seconds {
        return Err(FormatError::InvertedSpan {
            position,
            start_seconds,
            end_seconds,
        });
    }

    Ok(SubtitleEntry::new(start_seconds, end_seconds, lines[2..].join("\n")))
}

/// A parsed subtitle track together with the file it came from
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create an empty subtitle collection
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
        }
    }

    /// Read and parse an SRT file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;

        let entries = Self::parse_srt_string(&content)
            .with_context(|| format!("Failed to parse subtitle file: {}", path.display()))?;
        if entries.is_empty() {
            warn!("Subtitle file contains no entries: {}", path.display());
        }

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            entries,
        })
    }

    /// Parse SRT format string into subtitle entries
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>, FormatError> {
        parse_entries(content)
    }

    /// Sum of the individual cue durations
    pub fn total_cue_duration(&self) -> f64 {
        self.entries.iter().map(SubtitleEntry::duration).sum()
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        write!(f, "Spoken duration: {:.2}s", self.total_cue_duration())
    }
}
