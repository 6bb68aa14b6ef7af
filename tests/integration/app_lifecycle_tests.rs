/*!
 * Full app lifecycle tests: single files and folders written to disk
 */

use std::fs;
use subchunk::app_config::Config;
use subchunk::providers::mock::MockTranscriber;
use subchunk::report::ReportFormat;
use subchunk::Controller;
use crate::common;

#[tokio::test]
async fn test_run_withOutputPath_shouldWriteReport() -> anyhow::Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "talk.srt")?;
    let output = temp_dir.path().join("reports").join("talk.chunks.txt");

    let controller = Controller::with_config(Config::default())?;
    controller.run(input, Some(output.clone()), false).await?;

    assert_eq!(fs::read_to_string(&output)?, common::ABC_REPORT);
    Ok(())
}

#[tokio::test]
async fn test_run_withExistingOutput_shouldRespectForceFlag() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "talk.srt")?;
    let output = common::create_test_file(temp_dir.path(), "talk.chunks.txt", "old report")?;

    let controller = Controller::with_config(Config::default())?;

    controller.run(input.clone(), Some(output.clone()), false).await?;
    assert_eq!(fs::read_to_string(&output)?, "old report");

    controller.run(input, Some(output.clone()), true).await?;
    assert_eq!(fs::read_to_string(&output)?, common::ABC_REPORT);
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingInput_shouldFail() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(Config::default())?;

    let result = controller.run(temp_dir.path().join("nope.srt"), None, false).await;
    assert!(result.is_err());
    Ok(())
}

/// A failed transcription never lands in the report file
#[tokio::test]
async fn test_run_withFailedTranscription_shouldNotWriteOutput() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "talk.wav", "RIFF")?;
    let output = temp_dir.path().join("talk.chunks.json");

    let mut config = Config::default();
    config.report.format = ReportFormat::Json;
    let controller = Controller::with_config(config)?
        .with_transcriber(Box::new(MockTranscriber::failing("file does not appear to contain audio")));
    controller.run(input, Some(output.clone()), false).await?;

    assert!(!output.exists());
    Ok(())
}

/// Extracted audio must not replace a recording that shares the video's stem
#[tokio::test]
async fn test_run_withKeepAudio_shouldLeaveSiblingWavAlone() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_test_file(temp_dir.path(), "talk.mp4", "not a real video")?;
    let recording = common::create_test_file(temp_dir.path(), "talk.wav", "original recording")?;

    let mut config = Config::default();
    config.media.keep_audio = true;
    let mock = MockTranscriber::working(common::ABC_SRT).with_audio();
    let controller = Controller::with_config(config)?.with_transcriber(Box::new(mock.clone()));

    // The fake video cannot be decoded, with or without ffmpeg installed
    assert!(controller.run(video, None, false).await.is_err());

    assert_eq!(fs::read_to_string(&recording)?, "original recording");
    assert_eq!(mock.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_runFolder_shouldWriteReportNextToEachInput() -> anyhow::Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_subtitle(dir, "one.srt")?;
    fs::create_dir(dir.join("week2"))?;
    common::create_test_subtitle(&dir.join("week2"), "two.srt")?;

    let controller = Controller::with_config(Config::default())?;
    let written = controller.run_folder(dir.to_path_buf(), false).await?;

    assert_eq!(written, 2);
    assert_eq!(fs::read_to_string(dir.join("one.chunks.txt"))?, common::ABC_REPORT);
    assert_eq!(fs::read_to_string(dir.join("week2").join("two.chunks.txt"))?, common::ABC_REPORT);

    // Second pass finds the reports and leaves them alone
    let written = controller.run_folder(dir.to_path_buf(), false).await?;
    assert_eq!(written, 0);

    let written = controller.run_folder(dir.to_path_buf(), true).await?;
    assert_eq!(written, 2);
    Ok(())
}

#[tokio::test]
async fn test_runFolder_withMalformedTrack_shouldContinueBatch() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "a_broken.srt", "1\n00:00:00,000 00:00:01,000\ntext\n")?;
    common::create_test_subtitle(dir, "b_good.srt")?;

    let controller = Controller::with_config(Config::default())?;
    let written = controller.run_folder(dir.to_path_buf(), false).await?;

    assert_eq!(written, 1);
    assert!(!dir.join("a_broken.chunks.txt").exists());
    assert!(dir.join("b_good.chunks.txt").exists());
    Ok(())
}

/// Media with a track beside it is covered by the track; media without one is transcribed
#[tokio::test]
async fn test_runFolder_withMediaAndTracks_shouldTranscribeOnlyUncovered() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_subtitle(dir, "covered.srt")?;
    common::create_test_file(dir, "covered.mp4", "video")?;
    common::create_test_file(dir, "fresh.mp3", "audio")?;

    let mock = MockTranscriber::working(common::ABC_SRT);
    let controller = Controller::with_config(Config::default())?.with_transcriber(Box::new(mock.clone()));
    let written = controller.run_folder(dir.to_path_buf(), false).await?;

    assert_eq!(written, 2);
    assert_eq!(mock.request_count(), 1);
    assert_eq!(fs::read_to_string(dir.join("fresh.chunks.txt"))?, common::ABC_REPORT);
    Ok(())
}

#[tokio::test]
async fn test_runFolder_withJsonFormat_shouldUseJsonExtension() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_subtitle(dir, "talk.srt")?;

    let mut config = Config::default();
    config.report.format = ReportFormat::Json;
    let controller = Controller::with_config(config)?;
    controller.run_folder(dir.to_path_buf(), false).await?;

    let report = fs::read_to_string(dir.join("talk.chunks.json"))?;
    let value: serde_json::Value = serde_json::from_str(&report)?;
    assert_eq!(value.as_array().map(Vec::len), Some(2));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_runFolder_withSymlinkLoop_shouldStillProcessFiles() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_subtitle(dir, "talk.srt")?;
    fs::create_dir(dir.join("sub"))?;
    std::os::unix::fs::symlink("..", dir.join("sub").join("loop"))?;

    let controller = Controller::with_config(Config::default())?;
    let written = controller.run_folder(dir.to_path_buf(), false).await?;

    assert_eq!(written, 1);
    assert_eq!(fs::read_to_string(dir.join("talk.chunks.txt"))?, common::ABC_REPORT);
    Ok(())
}

#[tokio::test]
async fn test_runFolder_withEmptyDirectory_shouldWriteNothing() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(Config::default())?;

    assert_eq!(controller.run_folder(temp_dir.path().to_path_buf(), false).await?, 0);
    Ok(())
}
