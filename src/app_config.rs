use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::chunker::DEFAULT_MAX_CHUNK_DURATION_SECS;
use crate::errors::ConfigError;
use crate::report::ReportFormat;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Chunking settings
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Transcription settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Audio extraction settings
    #[serde(default)]
    pub media: MediaConfig,

    /// Report output settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Chunk aggregation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Cap on cumulative cue duration per chunk, in seconds
    #[serde(default = "default_max_chunk_duration_seconds")]
    pub max_chunk_duration_seconds: f64,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_duration_seconds: default_max_chunk_duration_seconds(),
        }
    }
}

/// Transcription provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProvider {
    // @provider: AssemblyAI HTTP API
    #[default]
    AssemblyAi,
    // @provider: Pre-made SRT next to the media file
    SubtitleFile,
}

impl TranscriptionProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::AssemblyAi => "AssemblyAI",
            Self::SubtitleFile => "Subtitle file",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::AssemblyAi => "assemblyai".to_string(),
            Self::SubtitleFile => "subtitlefile".to_string(),
        }
    }
}

impl std::fmt::Display for TranscriptionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranscriptionProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "assemblyai" => Ok(Self::AssemblyAi),
            "subtitlefile" | "srt" => Ok(Self::SubtitleFile),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Transcription service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    /// Transcription provider to use
    #[serde(default)]
    pub provider: TranscriptionProvider,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "default_assemblyai_endpoint")]
    pub endpoint: String,

    // @field: Delay between job status polls
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    // @field: Give up on a job after this long
    #[serde(default = "default_transcription_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Spoken language hint, service default when absent
    #[serde(default)]
    pub language_code: Option<String>,
}

impl TranscriptionConfig {
    /// Check the settings needed to actually build a transcriber
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider != TranscriptionProvider::AssemblyAi {
            return Ok(());
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey(self.provider.display_name().to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "transcription.poll_interval_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            provider: TranscriptionProvider::default(),
            api_key: String::new(),
            endpoint: default_assemblyai_endpoint(),
            poll_interval_ms: default_poll_interval_ms(),
            timeout_secs: default_transcription_timeout_secs(),
            language_code: None,
        }
    }
}

/// Audio extraction configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MediaConfig {
    /// ffmpeg timeout in seconds
    #[serde(default = "default_ffmpeg_timeout_secs")]
    pub ffmpeg_timeout_secs: u64,

    /// Keep the extracted audio next to the video instead of a temp dir
    #[serde(default)]
    pub keep_audio: bool,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_timeout_secs: default_ffmpeg_timeout_secs(),
            keep_audio: false,
        }
    }
}

/// Report output configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_max_chunk_duration_seconds() -> f64 {
    DEFAULT_MAX_CHUNK_DURATION_SECS
}

fn default_assemblyai_endpoint() -> String {
    "https://api.assemblyai.com".to_string()
}

fn default_poll_interval_ms() -> u64 {
    3000
}

fn default_transcription_timeout_secs() -> u64 {
    1800 // half an hour covers long videos
}

fn default_ffmpeg_timeout_secs() -> u64 {
    300
}

impl Config {
    /// Load a configuration file, writing the defaults there if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values.
    ///
    /// Transcription settings are checked separately, only once a media file
    /// actually needs transcribing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = self.chunking.max_chunk_duration_seconds;
        if !max.is_finite() || max <= 0.0 {
            return Err(ConfigError::InvalidMaxDuration(max));
        }

        if self.media.ffmpeg_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "media.ffmpeg_timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            chunking: ChunkingConfig::default(),
            transcription: TranscriptionConfig::default(),
            media: MediaConfig::default(),
            report: ReportConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
