/*!
 * External media tooling behind capability traits.
 *
 * All process invocation lives here, so the pipeline itself never touches a
 * binary directly:
 * - `Transcoder`: cutting, subtitle track probing/extraction, hard-sub
 *   burn-in, thumbnail derivation (`FfmpegTranscoder` in production)
 * - `SpeechRecognizer`: subtitle generation from audio
 *   (`WhisperRecognizer` in production, `NullRecognizer` when the tool is
 *   not installed)
 * - deterministic mocks for both, used by the test suite
 */

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::warn;

use crate::file_utils::FileManager;

pub mod ffmpeg;
pub mod mock;
pub mod whisper;

pub use ffmpeg::FfmpegTranscoder;
pub use whisper::{NullRecognizer, WhisperRecognizer};

/// Codec mode for clip rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecMode {
    /// Reuse the original compressed samples; fastest, no re-encoding
    StreamCopy,
    /// H.264 main profile, level 4.0, CRF 23, AAC 128k, faststart, yuv420p
    ReencodeH264,
}

impl std::fmt::Display for CodecMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StreamCopy => write!(f, "stream-copy"),
            Self::ReencodeH264 => write!(f, "h264"),
        }
    }
}

/// One subtitle stream inside a video container
#[derive(Debug, Clone)]
pub struct SubtitleTrack {
    /// Stream index within the container
    pub index: usize,
    /// Codec name as reported by the probe
    pub codec_name: String,
    /// Language tag, if present
    pub language: Option<String>,
    /// Title tag, if present
    pub title: Option<String>,
}

impl SubtitleTrack {
    /// Bitmap subtitle codecs cannot be converted to text SRT
    pub fn is_bitmap(&self) -> bool {
        matches!(
            self.codec_name.as_str(),
            "hdmv_pgs_subtitle" | "dvd_subtitle" | "dvb_subtitle" | "xsub"
        )
    }
}

/// Capability interface over the external transcoding tool
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Cut `[start, start+duration)` from the source into the output file,
    /// overwriting it unconditionally. Success requires a zero exit status
    /// and a non-empty output file.
    async fn clip(
        &self,
        source: &Path,
        start_secs: f64,
        duration_secs: f64,
        output: &Path,
        mode: CodecMode,
    ) -> Result<()>;

    /// List subtitle streams embedded in the video
    async fn list_subtitle_tracks(&self, video: &Path) -> Result<Vec<SubtitleTrack>>;

    /// Extract one embedded subtitle track to an SRT file
    async fn extract_subtitle_track(
        &self,
        video: &Path,
        track_index: usize,
        output: &Path,
    ) -> Result<()>;

    /// Burn subtitle text into the video frames, audio stream-copied
    async fn burn_subtitles(&self, video: &Path, subtitle: &Path, output: &Path) -> Result<()>;

    /// Derive a single still frame from a rendered clip
    async fn thumbnail(&self, clip: &Path, output: &Path) -> Result<()>;
}

/// Capability interface over the external speech-to-text tool
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe the video's audio into a subtitle file inside
    /// `output_dir`, returning the path the tool wrote (tool-default name;
    /// the caller renames it to the deterministic cache path).
    async fn transcribe(&self, video: &Path, output_dir: &Path) -> Result<PathBuf>;
}

/// Derive the thumbnail for a rendered clip at `<clipBase>_thumb.jpg`.
///
/// Idempotent: an existing thumbnail is returned without re-deriving, so
/// re-runs over a processed directory are cheap.
pub async fn generate_thumbnail(transcoder: &dyn Transcoder, clip: &Path) -> Result<PathBuf> {
    let thumb_path = FileManager::thumbnail_path(clip);
    if FileManager::file_exists(&thumb_path) {
        return Ok(thumb_path);
    }

    transcoder.thumbnail(clip, &thumb_path).await?;
    Ok(thumb_path)
}

/// Run an external command under a bounded execution budget, capturing its
/// output. A hung tool fails the invocation instead of stalling the batch.
pub(crate) async fn run_bounded(
    mut command: tokio::process::Command,
    timeout: Duration,
    tool: &str,
) -> Result<Output> {
    let future = command.output();

    tokio::select! {
        result = future => {
            result.map_err(|e| anyhow!("Failed to execute {} command: {}", tool, e))
        },
        _ = tokio::time::sleep(timeout) => {
            Err(anyhow!("{} command timed out after {}s", tool, timeout.as_secs()))
        }
    }
}

/// Combined stdout+stderr of a failed invocation, filtered for diagnostics
pub(crate) fn combined_diagnostic(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let mut combined = String::new();
    if !stdout.trim().is_empty() {
        combined.push_str(stdout.trim());
    }
    if !stderr.trim().is_empty() {
        if !combined.is_empty() {
            combined.push('\n');
        }
        combined.push_str(&filter_ffmpeg_stderr(&stderr));
    }

    if combined.is_empty() {
        warn!("External tool failed without producing any output");
        "unknown tool error (no output captured)".to_string()
    } else {
        combined
    }
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub(crate) fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Chapter",
        "    Chapter",
        "  Stream #",
        "      Metadata:",
        "        title",
        "        BPS",
        "        DURATION",
        "        NUMBER_OF",
        "        _STATISTICS",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| trimmed.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
