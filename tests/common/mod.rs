/*!
 * Common test utilities for the vocaclip test suite
 */

// Not every test file uses every helper
#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A small SRT document with three entries of everyday vocabulary
pub const SAMPLE_SRT: &str = r#"1
00:00:01,000 --> 00:00:03,500
The cat sat on the mat.

2
00:00:05,000 --> 00:00:08,000
A fast car drove past.

3
00:00:10,000 --> 00:00:12,000
Hello again!
"#;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}

/// Creates a fake video file; the mock tools never read its bytes
pub fn create_test_video(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, "not really mpeg4 data")
}

/// Creates a video together with its cached `_prepared.srt`, so pipeline
/// tests skip acquisition's external-tool strategies entirely
pub fn create_prepared_video(dir: &Path, filename: &str, srt: &str) -> Result<PathBuf> {
    let video = create_test_video(dir, filename)?;
    let prepared = vocaclip::file_utils::FileManager::prepared_subtitle_path(&video);
    fs::write(&prepared, srt)?;
    Ok(video)
}
