/*!
 * Tests for file utility functions
 */

use std::path::Path;
use subchunk::file_utils::{FileManager, FileType};
use crate::common;

#[test]
fn test_detectFileType_byExtension_shouldClassify() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    let srt = common::create_test_subtitle(dir, "talk.srt")?;
    let audio = common::create_test_file(dir, "talk.MP3", "not really audio")?;
    let video = common::create_test_file(dir, "talk.mkv", "not really video")?;

    assert_eq!(FileManager::detect_file_type(&srt)?, FileType::Subtitle);
    assert_eq!(FileManager::detect_file_type(&audio)?, FileType::Audio);
    assert_eq!(FileManager::detect_file_type(&video)?, FileType::Video);
    Ok(())
}

/// SRT content behind another extension is still recognized
#[test]
fn test_detectFileType_withSrtContentInTxt_shouldSniffSubtitle() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "captions.txt", common::ABC_SRT)?;

    assert_eq!(FileManager::detect_file_type(&file)?, FileType::Subtitle);
    Ok(())
}

#[test]
fn test_detectFileType_withPlainText_shouldBeUnknown() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "notes.txt", "just some notes --> nothing else")?;

    assert_eq!(FileManager::detect_file_type(&file)?, FileType::Unknown);
    Ok(())
}

/// Reports quote cue text, which may itself look like SRT
#[test]
fn test_detectFileType_withChunkReport_shouldBeUnknown() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "talk.chunks.txt", common::ABC_SRT)?;

    assert_eq!(FileManager::detect_file_type(&file)?, FileType::Unknown);
    Ok(())
}

#[test]
fn test_detectFileType_withMissingFile_shouldFail() {
    assert!(FileManager::detect_file_type("/no/such/file.srt").is_err());
}

#[test]
fn test_generateOutputPath_shouldReplaceExtension() {
    let path = FileManager::generate_output_path("/videos/talk.mp4", "/videos", "chunks.txt");
    assert_eq!(path, Path::new("/videos/talk.chunks.txt"));

    let path = FileManager::generate_output_path("talk.srt", "/tmp/out", ".wav");
    assert_eq!(path, Path::new("/tmp/out/talk.wav"));
}

#[test]
fn test_findSupportedFiles_shouldSkipUnknownAndSort() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    common::create_test_subtitle(dir, "b.srt")?;
    common::create_test_file(dir, "a.wav", "audio")?;
    common::create_test_file(dir, "readme.md", "# nothing")?;
    std::fs::create_dir(dir.join("nested"))?;
    common::create_test_subtitle(&dir.join("nested"), "c.srt")?;

    let files = FileManager::find_supported_files(dir)?;
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names.len(), 3);
    assert!(names.contains(&"a.wav".to_string()));
    assert!(names.contains(&"b.srt".to_string()));
    assert!(names.contains(&"c.srt".to_string()));
    assert!(!names.contains(&"readme.md".to_string()));
    Ok(())
}

#[test]
fn test_writeToFile_withMissingParent_shouldCreateIt() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("deep").join("report.txt");

    FileManager::write_to_file(&path, "content")?;
    assert_eq!(FileManager::read_to_string(&path)?, "content");
    Ok(())
}

/// Only a short prefix of an unknown file is inspected
#[test]
fn test_detectFileType_withLargeBinaryFile_shouldBeUnknown() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("disk.iso");
    std::fs::write(&path, vec![0xFFu8; 8 * 1024 * 1024])?;

    assert_eq!(FileManager::detect_file_type(&path)?, FileType::Unknown);
    Ok(())
}

#[test]
fn test_detectFileType_withLongTrackBehindTxt_shouldSniffFromPrefix() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut content = String::from(common::ABC_SRT);
    for i in 4..2000 {
        content.push_str(&format!("\n{}\n00:01:00,000 --> 00:01:01,000\nline {}\n", i, i));
    }
    let file = common::create_test_file(temp_dir.path(), "long.txt", &content)?;

    assert_eq!(FileManager::detect_file_type(&file)?, FileType::Subtitle);
    Ok(())
}

/// Audio extracted next to a video is not an input of its own
#[test]
fn test_detectFileType_withKeptAudio_shouldBeUnknown() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let kept = common::create_test_file(temp_dir.path(), "talk.subchunk.wav", "RIFF")?;
    let own = common::create_test_file(temp_dir.path(), "talk.wav", "RIFF")?;

    assert_eq!(FileManager::detect_file_type(&kept)?, FileType::Unknown);
    assert_eq!(FileManager::detect_file_type(&own)?, FileType::Audio);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_findSupportedFiles_withSymlinkLoop_shouldSkipIt() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_subtitle(dir, "talk.srt")?;
    std::fs::create_dir(dir.join("sub"))?;
    std::os::unix::fs::symlink("..", dir.join("sub").join("loop"))?;

    let files = FileManager::find_supported_files(dir)?;
    assert_eq!(files, vec![dir.join("talk.srt")]);
    Ok(())
}
