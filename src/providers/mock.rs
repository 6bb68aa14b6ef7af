/*!
 * Mock transcriber implementations for testing.
 *
 * This module provides a mock transcriber that simulates different behaviors:
 * - `MockTranscriber::working(srt)` - Always returns the given track
 * - `MockTranscriber::failing(msg)` - The service reports a failed job
 * - `MockTranscriber::unreachable()` - The request never reaches the service
 */

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Transcriber;

/// Behavior mode for the mock transcriber
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with this SRT text
    Working(String),
    /// The job runs but the service reports this error
    Failing(String),
    /// Transport failure before the service answers
    Unreachable,
}

/// Mock transcriber for testing pipeline behavior
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    /// Behavior mode
    behavior: MockBehavior,
    /// Whether the pipeline should hand over audio or the original media
    needs_audio: bool,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
}

impl MockTranscriber {
    /// Create a new mock transcriber with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            needs_audio: false,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that always returns `srt`
    pub fn working(srt: impl Into<String>) -> Self {
        Self::new(MockBehavior::Working(srt.into()))
    }

    /// Create a mock whose jobs always fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockBehavior::Failing(message.into()))
    }

    /// Create a mock that cannot reach its service
    pub fn unreachable() -> Self {
        Self::new(MockBehavior::Unreachable)
    }

    /// Ask the pipeline for extracted audio
    pub fn with_audio(mut self) -> Self {
        self.needs_audio = true;
        self
    }

    /// Number of transcribe calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Build an SRT track from `(start_ms, end_ms, text)` cues
    pub fn srt_from_cues(cues: &[(u64, u64, &str)]) -> String {
        cues.iter()
            .enumerate()
            .map(|(i, (start, end, text))| {
                format!("{}\n{} --> {}\n{}\n", i + 1, srt_time(*start), srt_time(*end), text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn srt_time(ms: u64) -> String {
    format!(
        "{:02}:{:02}:{:02},{:03}",
        ms / 3_600_000,
        (ms % 3_600_000) / 60_000,
        (ms % 60_000) / 1_000,
        ms % 1_000
    )
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _source: &Path) -> Result<String, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Working(srt) => Ok(srt.clone()),
            MockBehavior::Failing(message) => Err(ProviderError::TranscriptionFailed(message.clone())),
            MockBehavior::Unreachable => Err(ProviderError::RequestFailed(
                "Simulated connection failure".to_string(),
            )),
        }
    }

    fn needs_audio(&self) -> bool {
        self.needs_audio
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
