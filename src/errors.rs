/*!
 * Error types for the subchunk application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised while reading a subtitle track
///
/// Any of these aborts the whole parse; no chunk is produced for
/// malformed input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// A timecode did not match `H+:MM:SS,mmm`
    #[error("Invalid timecode '{timecode}': {reason}")]
    InvalidTimecode {
        /// The offending text
        timecode: String,
        /// What was wrong with it
        reason: String,
    },

    /// An entry had fewer than the three required lines
    #[error("Malformed subtitle entry #{position}: expected index, timecode and text lines, found {line_count} line(s)")]
    MalformedEntry {
        /// 1-based position of the entry in the input
        position: usize,
        /// Number of lines actually found
        line_count: usize,
    },

    /// The timecode line lacked the ` --> ` token
    #[error("Subtitle entry #{position} has no ' --> ' separator in timecode line '{line}'")]
    MissingTimecodeSeparator {
        /// 1-based position of the entry in the input
        position: usize,
        /// The timecode line as found
        line: String,
    },

    /// The entry ends before it starts
    #[error("Subtitle entry #{position} ends ({end_seconds}s) before it starts ({start_seconds}s)")]
    InvertedSpan {
        /// 1-based position of the entry in the input
        position: usize,
        /// Parsed start
        start_seconds: f64,
        /// Parsed end
        end_seconds: f64,
    },
}

/// Errors that can occur when talking to a transcription service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The service accepted the job but reported that transcription failed
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    /// The job did not finish in time
    #[error("Transcription timed out after {0} seconds")]
    Timeout(u64),

    /// Local I/O while preparing or reading a transcript
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors from the external media tools
#[derive(Error, Debug)]
pub enum MediaError {
    /// The input media does not exist
    #[error("Media file does not exist: {0}")]
    NotFound(String),

    /// ffmpeg could not be started
    #[error("Failed to execute ffmpeg: {0}")]
    Spawn(String),

    /// ffmpeg exited unsuccessfully
    #[error("ffmpeg audio extraction failed: {0}")]
    Failed(String),

    /// ffmpeg did not finish in time
    #[error("ffmpeg timed out after {0} seconds")]
    Timeout(u64),
}

/// Invalid configuration values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The chunk duration cap must be a positive, finite number of seconds
    #[error("Invalid max chunk duration: {0} (must be a positive number of seconds)")]
    InvalidMaxDuration(f64),

    /// The selected provider needs an API key
    #[error("Transcription API key is required for the {0} provider")]
    MissingApiKey(String),

    /// Any other inconsistent value
    #[error("Invalid configuration value for '{field}': {message}")]
    InvalidValue {
        /// Field name as it appears in the config file
        field: String,
        /// What is wrong with it
        message: String,
    },
}

impl From<std::io::Error> for ProviderError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}
