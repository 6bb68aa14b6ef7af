/*!
 * Transcription providers.
 *
 * A provider turns an audio (or media) file into an SRT subtitle track:
 * - AssemblyAI: remote speech-to-text API
 * - Subtitle file: reads a track that already sits next to the media
 * - Mock: canned responses for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;

use crate::app_config::{TranscriptionConfig, TranscriptionProvider};
use crate::errors::{ConfigError, ProviderError};

/// Common trait for all transcription providers
///
/// This trait is the only thing the pipeline knows about speech-to-text,
/// so the chunking code can be exercised without network or media files.
#[async_trait]
pub trait Transcriber: Send + Sync + Debug {
    /// Produce an SRT track for the given file
    ///
    /// # Returns
    /// * `Ok(srt)` - The subtitle track text
    /// * `Err(ProviderError::TranscriptionFailed(_))` - The service ran the job and reported failure
    /// * `Err(_)` - Any transport, auth or I/O failure
    async fn transcribe(&self, source: &Path) -> Result<String, ProviderError>;

    /// Whether `transcribe` expects extracted audio rather than the original media
    fn needs_audio(&self) -> bool {
        true
    }

    /// Human readable provider name
    fn name(&self) -> &str;
}

/// Build the transcriber selected in the configuration
pub fn create_transcriber(config: &TranscriptionConfig) -> Result<Box<dyn Transcriber>, ConfigError> {
    config.validate()?;

    match config.provider {
        TranscriptionProvider::AssemblyAi => Ok(Box::new(assemblyai::AssemblyAi::from_config(config))),
        TranscriptionProvider::SubtitleFile => Ok(Box::new(subtitle_file::SubtitleFile::new())),
    }
}

pub mod assemblyai;
pub mod subtitle_file;
pub mod mock;
