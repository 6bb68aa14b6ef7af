use std::path::{Path, PathBuf};
use std::time::Duration;
use log::{debug, error};
use tokio::process::Command;

use crate::errors::MediaError;

// @module: External media tools

// @const: Suffix of audio tracks we extract next to their video
pub const KEPT_AUDIO_SUFFIX: &str = "subchunk.wav";

// @const: Lines of ffmpeg stderr that never explain a failure
const FFMPEG_NOISE_PREFIXES: [&str; 14] = [
    "ffmpeg version",
    "built with",
    "configuration:",
    "lib",
    "Input #",
    "Metadata:",
    "Duration:",
    "Stream #",
    "encoder",
    "handler_name",
    "Output #",
    "Stream mapping:",
    "Press [q]",
    "size=",
];

/// Extract a mono 16 kHz PCM WAV track from a video file.
///
/// Speech-to-text services accept this everywhere, and it keeps uploads
/// small compared to the original container.
pub async fn extract_audio(video_path: &Path, audio_path: &Path, timeout: Duration) -> Result<(), MediaError> {
    if !video_path.exists() {
        return Err(MediaError::NotFound(video_path.display().to_string()));
    }

    debug!("Extracting audio from {} to {}", video_path.display(), audio_path.display());

    let ffmpeg_future = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(video_path)
        .args(["-vn", "-ac", "1", "-ar", "16000", "-c:a", "pcm_s16le"])
        .arg(audio_path)
        .kill_on_drop(true)
        .output();

    let output = tokio::select! {
        result = ffmpeg_future => {
            result.map_err(|e| MediaError::Spawn(e.to_string()))?
        },
        _ = tokio::time::sleep(timeout) => {
            return Err(MediaError::Timeout(timeout.as_secs()));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let filtered = filter_ffmpeg_stderr(&stderr);
        error!("Audio extraction failed: {}", filtered);
        return Err(MediaError::Failed(filtered));
    }

    Ok(())
}

/// Where a kept audio track goes: `talk.mp4` -> `talk.subchunk.wav`.
///
/// Never the plain `<stem>.wav`, which may be the user's own recording.
pub fn kept_audio_path(video_path: &Path) -> PathBuf {
    let stem = video_path.file_stem().unwrap_or_default().to_string_lossy();
    video_path.with_file_name(format!("{}.{}", stem, KEPT_AUDIO_SUFFIX))
}

/// Keep only the stderr lines that explain an ffmpeg failure
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !FFMPEG_NOISE_PREFIXES.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
