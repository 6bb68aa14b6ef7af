/*!
 * Common test utilities for the subchunk test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Route library logs through env_logger, once per test binary
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Three cues: A and B fit in one chunk, C does not
pub const ABC_SRT: &str = "1
00:00:00,000 --> 00:00:05,000
A

2
00:00:05,000 --> 00:00:10,000
B

3
00:00:10,000 --> 00:00:20,000
C
";

/// Report produced for ABC_SRT with the default 15 second cap
pub const ABC_REPORT: &str = "Chunk 1 (duration:10.00s,start:00:00:00.00 --> end:00:00:10.00): A B

Chunk 2 (duration:10.00s,start:00:00:10.00 --> end:00:00:20.00): C";

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, ABC_SRT)
}
