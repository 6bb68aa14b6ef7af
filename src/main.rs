// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use subchunk::app_config::{self, Config, TranscriptionProvider};
use subchunk::report::ReportFormat;
use subchunk::Controller;

/// CLI Wrapper for TranscriptionProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranscriptionProvider {
    #[value(name = "assemblyai")]
    AssemblyAi,
    SubtitleFile,
}

impl From<CliTranscriptionProvider> for TranscriptionProvider {
    fn from(cli_provider: CliTranscriptionProvider) -> Self {
        match cli_provider {
            CliTranscriptionProvider::AssemblyAi => TranscriptionProvider::AssemblyAi,
            CliTranscriptionProvider::SubtitleFile => TranscriptionProvider::SubtitleFile,
        }
    }
}

/// CLI Wrapper for ReportFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliReportFormat {
    Text,
    Json,
}

impl From<CliReportFormat> for ReportFormat {
    fn from(cli_format: CliReportFormat) -> Self {
        match cli_format {
            CliReportFormat::Text => ReportFormat::Text,
            CliReportFormat::Json => ReportFormat::Json,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chunk a subtitle track, or transcribe and chunk a media file (default command)
    Chunk(ChunkArgs),

    /// Generate shell completions for subchunk
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ChunkArgs {
    /// Input .srt, audio or video file, or a directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Cap on cumulative cue duration per chunk, in seconds
    #[arg(short, long)]
    max_duration: Option<f64>,

    /// Report format
    #[arg(long, value_enum)]
    format: Option<CliReportFormat>,

    /// Write the report here instead of stdout (single file input only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Transcription provider for audio and video inputs
    #[arg(short, long, value_enum)]
    provider: Option<CliTranscriptionProvider>,

    /// Transcription API key
    #[arg(long, env = "ASSEMBLYAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "subchunk.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subchunk - subtitle tracks summarized as timed chunks
#[derive(Parser, Debug)]
#[command(name = "subchunk")]
#[command(version)]
#[command(about = "Re-segment subtitle tracks into duration-capped chunks")]
#[command(long_about = "subchunk groups consecutive subtitle cues into chunks whose spoken duration stays under a cap,
and prints when each chunk starts and ends. Audio and video inputs are transcribed first.

EXAMPLES:
    subchunk talk.srt                          # Chunk with the default 15s cap
    subchunk -m 30 talk.srt                    # Chunks of up to 30s of speech
    subchunk --format json -o talk.json talk.srt
    subchunk talk.mp4                          # Extract audio, transcribe, chunk
    subchunk -p subtitle-file talk.mp4         # Use talk.srt next to the video
    subchunk -f /lectures/                     # Write <name>.chunks.txt for every file
    subchunk completions bash > subchunk.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in subchunk.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input .srt, audio or video file, or a directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Cap on cumulative cue duration per chunk, in seconds
    #[arg(short, long)]
    max_duration: Option<f64>,

    /// Report format
    #[arg(long, value_enum)]
    format: Option<CliReportFormat>,

    /// Write the report here instead of stdout (single file input only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Transcription provider for audio and video inputs
    #[arg(short, long, value_enum)]
    provider: Option<CliTranscriptionProvider>,

    /// Transcription API key
    #[arg(long, env = "ASSEMBLYAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "subchunk.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // Filtering happens through log::max_level so it can change after init
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Prefix and ANSI color for level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => ("", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (prefix, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {}{}\x1B[0m", color, now, prefix, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at info; the config or --log-level may change it below
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subchunk", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Chunk(args)) => run_chunk(args).await,
        None => {
            // Default behavior - use top-level args
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            run_chunk(ChunkArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                max_duration: cli.max_duration,
                format: cli.format,
                output: cli.output,
                provider: cli.provider,
                api_key: cli.api_key,
                config_path: cli.config_path,
                log_level: cli.log_level,
            })
            .await
        }
    }
}

/// Apply command line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, options: &ChunkArgs) {
    if let Some(max_duration) = options.max_duration {
        config.chunking.max_chunk_duration_seconds = max_duration;
    }

    if let Some(format) = &options.format {
        config.report.format = format.clone().into();
    }

    if let Some(provider) = &options.provider {
        config.transcription.provider = provider.clone().into();
    }

    if let Some(api_key) = &options.api_key {
        config.transcription.api_key = api_key.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

async fn run_chunk(options: ChunkArgs) -> Result<()> {
    // If log level is set via command line, apply it before loading the config
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)?;
    apply_overrides(&mut config, &options);
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    if options.input_path.is_file() {
        controller.run(options.input_path, options.output, options.force_overwrite).await
    } else if options.input_path.is_dir() {
        if options.output.is_some() {
            return Err(anyhow!("--output cannot be used with a directory input"));
        }
        let written = controller.run_folder(options.input_path, options.force_overwrite).await?;
        info!("Wrote {} report(s)", written);
        Ok(())
    } else {
        Err(anyhow!("Input path does not exist: {:?}", options.input_path))
    }
}
