use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Marker suffix of hard-subtitled derivative videos. Files carrying it are
/// generated outputs and must never be picked up as sources in sentence mode.
pub const HARD_SUB_MARKER: &str = "_with_srt";

/// Suffix of the cached prepared subtitle next to its video.
const PREPARED_SUFFIX: &str = "_prepared";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Non-empty file, the transcoder success criterion
    pub fn non_empty_file<P: AsRef<Path>>(path: P) -> bool {
        fs::metadata(path.as_ref())
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false)
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Recursively find video files under a directory, by extension set.
    ///
    /// Results are sorted by path so repeated runs process videos in a
    /// stable order. When `exclude_marker` is set, any file whose name
    /// contains it is dropped from the candidate set.
    pub fn scan_videos<P: AsRef<Path>>(
        dir: P,
        extensions: &[String],
        exclude_marker: Option<&str>,
    ) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let Some(ext) = path.extension() else {
                continue;
            };
            let ext = ext.to_string_lossy().to_lowercase();
            if !extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
                continue;
            }

            if let Some(marker) = exclude_marker {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                if name.contains(marker) {
                    continue;
                }
            }

            result.push(path.to_path_buf());
        }

        result.sort();
        Ok(result)
    }

    /// Base name of a video without its extension
    pub fn base_name<P: AsRef<Path>>(path: P) -> String {
        path.as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Directory a video lives in, falling back to the current directory
    pub fn parent_dir<P: AsRef<Path>>(path: P) -> PathBuf {
        path.as_ref()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// `<base>_prepared.srt` next to the video: the acquisition cache file
    pub fn prepared_subtitle_path<P: AsRef<Path>>(video: P) -> PathBuf {
        let video = video.as_ref();
        Self::parent_dir(video).join(format!("{}{}.srt", Self::base_name(video), PREPARED_SUFFIX))
    }

    /// `<base>.srt` next to the video: the speech-to-text tool's default output
    pub fn default_subtitle_path<P: AsRef<Path>>(video: P) -> PathBuf {
        let video = video.as_ref();
        Self::parent_dir(video).join(format!("{}.srt", Self::base_name(video)))
    }

    /// `<base>_with_srt.mp4` sibling: the sentence-mode hard-sub derivative
    pub fn hard_sub_sibling_path<P: AsRef<Path>>(video: P) -> PathBuf {
        let video = video.as_ref();
        Self::parent_dir(video).join(format!("{}{}.mp4", Self::base_name(video), HARD_SUB_MARKER))
    }

    /// `<source>.backup`: where the original lands when word mode replaces it
    pub fn backup_path<P: AsRef<Path>>(video: P) -> PathBuf {
        let video = video.as_ref();
        let mut name = video.as_os_str().to_os_string();
        name.push(".backup");
        PathBuf::from(name)
    }

    /// `<base>_<word>.mp4` in the source directory
    pub fn word_clip_path<P: AsRef<Path>>(video: P, word: &str) -> PathBuf {
        let video = video.as_ref();
        Self::parent_dir(video).join(format!("{}_{}.mp4", Self::base_name(video), word))
    }

    /// `<base>_sentence_<NNN>_<slug>.mp4` in the output directory
    pub fn sentence_clip_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        video: P1,
        output_dir: P2,
        index: usize,
        slug: &str,
    ) -> PathBuf {
        output_dir.as_ref().join(format!(
            "{}_sentence_{:03}_{}.mp4",
            Self::base_name(video),
            index,
            slug
        ))
    }

    /// `<clipBase>_thumb.jpg` next to the clip
    pub fn thumbnail_path<P: AsRef<Path>>(clip: P) -> PathBuf {
        let clip = clip.as_ref();
        Self::parent_dir(clip).join(format!("{}_thumb.jpg", Self::base_name(clip)))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Size of a file in bytes, stat'ed at call time
    pub fn file_size<P: AsRef<Path>>(path: P) -> Result<i64> {
        let metadata = fs::metadata(path.as_ref())
            .with_context(|| format!("Failed to stat file: {:?}", path.as_ref()))?;
        Ok(metadata.len() as i64)
    }
}
