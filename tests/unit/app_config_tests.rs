/*!
 * Tests for application configuration functionality
 */

use subchunk::app_config::{Config, LogLevel, TranscriptionConfig, TranscriptionProvider};
use subchunk::errors::ConfigError;
use subchunk::report::ReportFormat;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.chunking.max_chunk_duration_seconds, 15.0);
    assert_eq!(config.transcription.provider, TranscriptionProvider::AssemblyAi);
    assert_eq!(config.transcription.endpoint, "https://api.assemblyai.com");
    assert_eq!(config.transcription.poll_interval_ms, 3000);
    assert!(config.transcription.api_key.is_empty());
    assert_eq!(config.media.ffmpeg_timeout_secs, 300);
    assert!(!config.media.keep_audio);
    assert_eq!(config.report.format, ReportFormat::Text);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Default config is valid without an API key; only transcription needs one
#[test]
fn test_validate_withDefaultConfig_shouldPass() {
    assert!(Config::default().validate().is_ok());
    assert_eq!(
        Config::default().transcription.validate(),
        Err(ConfigError::MissingApiKey("AssemblyAI".to_string()))
    );
}

#[test]
fn test_validate_withNonPositiveMaxDuration_shouldFail() {
    for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let mut config = Config::default();
        config.chunking.max_chunk_duration_seconds = bad;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidMaxDuration(_))));
    }
}

#[test]
fn test_transcriptionValidate_withSubtitleFileProvider_shouldNotNeedKey() {
    let config = TranscriptionConfig {
        provider: TranscriptionProvider::SubtitleFile,
        ..TranscriptionConfig::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_transcriptionValidate_withZeroPollInterval_shouldFail() {
    let config = TranscriptionConfig {
        api_key: "key".to_string(),
        poll_interval_ms: 0,
        ..TranscriptionConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
}

/// Partial config files fall back to defaults for missing fields
#[test]
fn test_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{ "chunking": { "max_chunk_duration_seconds": 30.0 }, "report": { "format": "json" } }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.chunking.max_chunk_duration_seconds, 30.0);
    assert_eq!(config.report.format, ReportFormat::Json);
    assert_eq!(config.transcription.poll_interval_ms, 3000);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_provider_fromStr_shouldAcceptKnownNames() {
    assert_eq!("AssemblyAI".parse::<TranscriptionProvider>().unwrap(), TranscriptionProvider::AssemblyAi);
    assert_eq!("srt".parse::<TranscriptionProvider>().unwrap(), TranscriptionProvider::SubtitleFile);
    assert!("whisper".parse::<TranscriptionProvider>().is_err());
    assert_eq!(TranscriptionProvider::SubtitleFile.to_string(), "subtitlefile");
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("subchunk.json");

    let config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(config.chunking.max_chunk_duration_seconds, 15.0);

    let written: Config = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(written.transcription.provider, TranscriptionProvider::AssemblyAi);
    Ok(())
}

#[test]
fn test_loadOrCreate_withExistingFile_shouldReadIt() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "custom.json",
        r#"{ "chunking": { "max_chunk_duration_seconds": 42.0 }, "log_level": "debug" }"#,
    )?;

    let config = Config::load_or_create(&path)?;
    assert_eq!(config.chunking.max_chunk_duration_seconds, 42.0);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
    Ok(())
}

#[test]
fn test_loadOrCreate_withBrokenJson_shouldFail() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;

    let err = Config::load_or_create(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
    Ok(())
}
