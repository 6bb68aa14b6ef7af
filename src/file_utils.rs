use anyhow::{Context, Result};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::media::KEPT_AUDIO_SUFFIX;

// @module: File and directory utilities

// @const: Index line followed by an SRT timecode line
static SRT_SHAPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*\d+\s*\r?\n\s*\d+:\d{2}:\d{2},\d{1,3}\s+-->\s+\d+:\d{2}:\d{2},\d{1,3}")
        .expect("SRT shape regex is valid")
});

// @const: Bytes read when sniffing a file of unknown type
const SNIFF_PREFIX_BYTES: u64 = 4096;

const VIDEO_EXTENSIONS: [&str; 14] = [
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v",
    "mpg", "mpeg", "ogv", "ts", "mts", "m2ts",
];

const AUDIO_EXTENSIONS: [&str; 8] = ["wav", "mp3", "m4a", "flac", "ogg", "opus", "aac", "wma"];

/// Enum representing different file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Subtitle file (SRT)
    Subtitle,
    /// Audio file that can be sent to a transcriber as is
    Audio,
    /// Video file, audio must be extracted first
    Video,
    /// Unknown file type
    Unknown,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @generates: Report path next to the input, e.g. talk.mp4 -> talk.chunks.txt
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(extension.trim_start_matches('.'));

        output_dir.as_ref().join(output_filename)
    }

    /// Find every file under `dir` whose type the pipeline can process
    pub fn find_supported_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        let entries = WalkDir::new(dir.as_ref())
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable directory entry: {}", e);
                    None
                }
            });

        for entry in entries {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            match Self::detect_file_type(path) {
                Ok(FileType::Unknown) => {}
                Ok(_) => result.push(path.to_path_buf()),
                Err(e) => warn!("Skipping {:?}: {}", path, e),
            }
        }

        Ok(result)
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
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    /// Classify a file by extension, falling back to sniffing for SRT content
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();

            // Audio we extracted earlier; its video is the input
            if path.to_string_lossy().ends_with(KEPT_AUDIO_SUFFIX) {
                return Ok(FileType::Unknown);
            }
            if ext_str == "srt" {
                return Ok(FileType::Subtitle);
            }
            if AUDIO_EXTENSIONS.contains(&ext_str.as_str()) {
                return Ok(FileType::Audio);
            }
            if VIDEO_EXTENSIONS.contains(&ext_str.as_str()) {
                return Ok(FileType::Video);
            }
            // Our own reports sit next to inputs; never treat them as tracks
            if ext_str == "txt" || ext_str == "json" {
                let name = path.to_string_lossy();
                if name.ends_with(".chunks.txt") || name.ends_with(".chunks.json") {
                    return Ok(FileType::Unknown);
                }
            }
        }

        // Binary or unreadable files simply are not subtitle tracks
        match Self::read_prefix(path, SNIFF_PREFIX_BYTES) {
            Ok(prefix) if prefix.contains("-->") && SRT_SHAPE_REGEX.is_match(&prefix) => Ok(FileType::Subtitle),
            _ => Ok(FileType::Unknown),
        }
    }

    // @returns: At most `limit` leading bytes, invalid UTF-8 replaced
    fn read_prefix(path: &Path, limit: u64) -> Result<String> {
        let mut buffer = Vec::new();
        File::open(path)
            .with_context(|| format!("Failed to open file: {:?}", path))?
            .take(limit)
            .read_to_end(&mut buffer)
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
