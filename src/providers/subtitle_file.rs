use std::path::{Path, PathBuf};
use async_trait::async_trait;
use log::debug;

use crate::errors::ProviderError;
use crate::providers::Transcriber;

/// Offline "transcriber" that reads the `.srt` stored beside a media file
///
/// `talk.mp4` is transcribed by reading `talk.srt`. Useful when a track was
/// produced earlier, or by another tool.
#[derive(Debug, Default, Clone)]
pub struct SubtitleFile;

impl SubtitleFile {
    pub fn new() -> Self {
        Self
    }

    /// Path of the track expected for `source`
    pub fn sidecar_path(source: &Path) -> PathBuf {
        source.with_extension("srt")
    }
}

#[async_trait]
impl Transcriber for SubtitleFile {
    async fn transcribe(&self, source: &Path) -> Result<String, ProviderError> {
        let sidecar = Self::sidecar_path(source);
        debug!("Looking for subtitle track at {}", sidecar.display());

        match tokio::fs::read_to_string(&sidecar).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ProviderError::TranscriptionFailed(
                format!("no subtitle track found at {}", sidecar.display()),
            )),
            Err(e) => Err(e.into()),
        }
    }

    fn needs_audio(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "Subtitle file"
    }
}
