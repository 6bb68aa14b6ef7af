use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::chunker::Chunk;
use crate::timecode::format_seconds;

// @module: Rendering of chunk sequences

// @const: Blank line between chunk blocks
const BLOCK_SEPARATOR: &str = "\n\n";

/// Output format of a report
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    /// Extension used for report files written next to their input
    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Text => "chunks.txt",
            Self::Json => "chunks.json",
        }
    }
}

/// Render one chunk as a single report line
pub fn render_chunk(chunk: &Chunk) -> String {
    format!(
        "Chunk {} (duration:{:.2}s,start:{} --> end:{}): {}",
        chunk.id,
        chunk.length_seconds,
        format_seconds(chunk.start_seconds),
        format_seconds(chunk.end_seconds),
        chunk.text
    )
}

/// Render the chunks as text blocks separated by a blank line
pub fn render(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(render_chunk)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Render the chunks as a pretty-printed JSON array
pub fn render_json(chunks: &[Chunk]) -> Result<String> {
    serde_json::to_string_pretty(chunks).context("Failed to serialize chunks to JSON")
}

/// Render in the requested format
pub fn render_as(chunks: &[Chunk], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render(chunks)),
        ReportFormat::Json => render_json(chunks),
    }
}
