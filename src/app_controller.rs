use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use once_cell::sync::OnceCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_config::Config;
use crate::chunker::{Chunk, ChunkAggregator};
use crate::errors::{FormatError, ProviderError};
use crate::file_utils::{FileManager, FileType};
use crate::media;
use crate::providers::{self, Transcriber};
use crate::report;
use crate::subtitle_processor::parse_entries;

// @module: Application controller for the chunking pipeline

/// What the pipeline hands back to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutput {
    /// The rendered chunk report
    Report(String),
    /// The transcriber reported a failed job; carries its message verbatim
    TranscriptionError(String),
}

impl PipelineOutput {
    pub fn is_report(&self) -> bool {
        matches!(self, Self::Report(_))
    }
}

impl fmt::Display for PipelineOutput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Report(report) => write!(f, "{}", report),
            Self::TranscriptionError(message) => write!(f, "Error in transcription: {}", message),
        }
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Built on first use; plain SRT inputs never need one
    transcriber: OnceCell<Box<dyn Transcriber>>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        Ok(Self {
            config,
            transcriber: OnceCell::new(),
        })
    }

    /// Use this transcriber instead of the one selected in the configuration
    pub fn with_transcriber(self, transcriber: Box<dyn Transcriber>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(transcriber);
        Self {
            config: self.config,
            transcriber: cell,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn transcriber(&self) -> Result<&dyn Transcriber> {
        let transcriber = self.transcriber.get_or_try_init(|| {
            providers::create_transcriber(&self.config.transcription)
                .context("Cannot create transcriber")
        })?;
        Ok(transcriber.as_ref())
    }

    fn aggregator(&self) -> ChunkAggregator {
        // validated in with_config
        ChunkAggregator::new(self.config.chunking.max_chunk_duration_seconds).unwrap_or_default()
    }

    /// Parse and aggregate a subtitle track
    pub fn chunk_subtitles(&self, srt: &str) -> Result<Vec<Chunk>, FormatError> {
        let entries = parse_entries(srt)?;
        Ok(self.aggregator().aggregate(entries))
    }

    /// Parse, aggregate and render a subtitle track in the configured format
    pub fn generate_report(&self, srt: &str) -> Result<String> {
        let chunks = self.chunk_subtitles(srt)?;
        info!("Produced {} chunk(s)", chunks.len());
        report::render_as(&chunks, self.config.report.format)
    }

    /// Transcribe `source` with `transcriber` and report on the result
    pub async fn report_from_transcriber(&self, transcriber: &dyn Transcriber, source: &Path) -> Result<PipelineOutput> {
        info!("Transcribing {} with {}", source.display(), transcriber.name());

        match transcriber.transcribe(source).await {
            Ok(srt) => Ok(PipelineOutput::Report(self.generate_report(&srt)?)),
            Err(ProviderError::TranscriptionFailed(message)) => {
                warn!("Transcription of {} failed: {}", source.display(), message);
                Ok(PipelineOutput::TranscriptionError(message))
            }
            Err(e) => Err(anyhow!(e)).with_context(|| format!("Failed to transcribe {}", source.display())),
        }
    }

    /// Run the whole pipeline for one input file
    pub async fn process_file(&self, input_file: &Path) -> Result<PipelineOutput> {
        match FileManager::detect_file_type(input_file)? {
            FileType::Subtitle => {
                debug!("Detected subtitle file, skipping transcription");
                let content = FileManager::read_to_string(input_file)?;
                Ok(PipelineOutput::Report(self.generate_report(&content)?))
            }
            FileType::Audio => {
                let transcriber = self.transcriber()?;
                self.report_from_transcriber(transcriber, input_file).await
            }
            FileType::Video => {
                let transcriber = self.transcriber()?;
                if !transcriber.needs_audio() {
                    return self.report_from_transcriber(transcriber, input_file).await;
                }
                self.process_video(transcriber, input_file).await
            }
            FileType::Unknown => Err(anyhow!("Unsupported input file: {:?}", input_file)),
        }
    }

    async fn process_video(&self, transcriber: &dyn Transcriber, video: &Path) -> Result<PipelineOutput> {
        let timeout = Duration::from_secs(self.config.media.ffmpeg_timeout_secs);

        if self.config.media.keep_audio {
            let audio = media::kept_audio_path(video);
            media::extract_audio(video, &audio, timeout).await?;
            return self.report_from_transcriber(transcriber, &audio).await;
        }

        // Removed with the directory once the report is built
        let temp_dir = tempfile::Builder::new()
            .prefix("subchunk-")
            .tempdir()
            .context("Failed to create temporary directory for audio")?;
        let audio = FileManager::generate_output_path(video, temp_dir.path(), "wav");

        media::extract_audio(video, &audio, timeout).await?;
        self.report_from_transcriber(transcriber, &audio).await
    }

    /// Process one file, writing the output to `output` or stdout
    pub async fn run(&self, input_file: PathBuf, output: Option<PathBuf>, force_overwrite: bool) -> Result<()> {
        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        if let Some(path) = &output {
            if path.exists() && !force_overwrite {
                warn!("Output file already exists: {:?}. Use -f to force overwrite.", path);
                return Ok(());
            }
        }

        let start_time = std::time::Instant::now();
        let result = self.process_file(&input_file).await?;

        match (output, result) {
            (Some(path), PipelineOutput::Report(report)) => {
                FileManager::write_to_file(&path, &report)?;
                info!("Success: {:?} ({:.1}s)", path, start_time.elapsed().as_secs_f64());
            }
            // The output file only ever holds a report in the configured format
            (Some(path), failed) => {
                warn!("Not writing {:?}: {}", path, failed);
                println!("{}", failed);
            }
            (None, result) => println!("{}", result),
        }

        Ok(())
    }

    /// Process every supported file under `input_dir`, writing each report
    /// next to its input. Returns the number of reports written.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<usize> {
        let files = FileManager::find_supported_files(&input_dir)?;
        let files: Vec<PathBuf> = files
            .iter()
            .filter(|path| !Self::shadowed_by_track(path, &files))
            .cloned()
            .collect();

        if files.is_empty() {
            warn!("No subtitle, audio or video files found in {:?}", input_dir);
            return Ok(0);
        }

        let progress = ProgressBar::new(files.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓▒░"),
        );

        let extension = self.config.report.format.file_extension();
        let mut written = 0;

        for file in &files {
            let file_name = file.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
            progress.set_message(file_name);

            let output_path = FileManager::generate_output_path(file, file.parent().unwrap_or(Path::new(".")), extension);
            if output_path.exists() && !force_overwrite {
                debug!("Skipping {:?}, report already exists", file);
                progress.inc(1);
                continue;
            }

            match self.process_file(file).await {
                Ok(PipelineOutput::Report(report)) => match FileManager::write_to_file(&output_path, &report) {
                    Ok(()) => written += 1,
                    Err(e) => error!("Failed to write {:?}: {}", output_path, e),
                },
                Ok(failed) => warn!("{:?}: {}", file, failed),
                Err(e) => error!("Error processing {:?}: {:#}", file, e),
            }
            progress.inc(1);
        }

        progress.finish_with_message("done");
        info!("Finished: {} of {} file(s) processed", written, files.len());
        Ok(written)
    }

    // A media file whose subtitle track is also in the batch would write the same report
    fn shadowed_by_track(path: &Path, files: &[PathBuf]) -> bool {
        let is_track = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("srt"));
        !is_track && files.contains(&path.with_extension("srt"))
    }
}
