use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::{debug, error};
use serde_json::{Value, from_str};
use tokio::process::Command;

use super::{
    CodecMode, SubtitleTrack, Transcoder, combined_diagnostic, filter_ffmpeg_stderr, run_bounded,
};
use crate::file_utils::FileManager;
use crate::subtitle_processor::TimeCode;

// @module: ffmpeg/ffprobe-backed transcoder

/// Production transcoder invoking ffmpeg and ffprobe as external processes.
///
/// Every invocation runs under the configured per-invocation budget and
/// always overwrites existing output files (`-y`); the only temp-then-rename
/// dance in the system is the hard-subtitle derivative, which the acquirer
/// owns.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    /// Bounded execution budget per invocation
    timeout: Duration,
}

impl FfmpegTranscoder {
    /// Create a transcoder with the given per-invocation timeout
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    fn path_arg(path: &Path) -> &str {
        path.to_str().unwrap_or_default()
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn clip(
        &self,
        source: &Path,
        start_secs: f64,
        duration_secs: f64,
        output: &Path,
        mode: CodecMode,
    ) -> Result<()> {
        let start = TimeCode::format_seconds(start_secs);
        let duration = TimeCode::format_seconds(duration_secs);

        debug!(
            "Rendering {} clip: start={}s duration={}s -> {:?}",
            mode, start, duration, output
        );

        let mut command = Command::new("ffmpeg");
        command.args(["-i", Self::path_arg(source), "-ss", &start, "-t", &duration]);

        match mode {
            CodecMode::StreamCopy => {
                command.args(["-c", "copy"]);
            }
            CodecMode::ReencodeH264 => {
                command.args([
                    // H.264 main profile at level 4.0 plays on mobile decoders
                    "-c:v",
                    "libx264",
                    "-profile:v",
                    "main",
                    "-level",
                    "4.0",
                    "-preset",
                    "medium",
                    "-crf",
                    "23",
                    "-c:a",
                    "aac",
                    "-b:a",
                    "128k",
                    // faststart relocates metadata so playback starts mid-download
                    "-movflags",
                    "+faststart",
                    "-pix_fmt",
                    "yuv420p",
                ]);
            }
        }

        command.args([
            "-avoid_negative_ts",
            "make_zero",
            Self::path_arg(output),
            "-y",
        ]);

        let result = run_bounded(command, self.timeout, "ffmpeg").await?;

        if !result.status.success() {
            return Err(anyhow!(
                "ffmpeg clip failed: {}",
                combined_diagnostic(&result)
            ));
        }

        if !FileManager::non_empty_file(output) {
            return Err(anyhow!(
                "ffmpeg exited cleanly but produced no output at {:?}",
                output
            ));
        }

        Ok(())
    }

    async fn list_subtitle_tracks(&self, video: &Path) -> Result<Vec<SubtitleTrack>> {
        if !video.exists() {
            return Err(anyhow!("Video file not found: {:?}", video));
        }

        let mut command = Command::new("ffprobe");
        command.args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            "-select_streams",
            "s",
            Self::path_arg(video),
        ]);

        let output = run_bounded(command, self.timeout, "ffprobe").await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffprobe failed: {}", stderr);
            return Err(anyhow!("ffprobe command failed: {}", stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Ok(Vec::new());
        }

        let json: Value = from_str(&stdout).context("Failed to parse ffprobe JSON output")?;

        let mut tracks = Vec::new();

        if let Some(streams) = json.get("streams").and_then(|s| s.as_array()) {
            for stream in streams.iter() {
                let index = stream
                    .get("index")
                    .and_then(|v| v.as_u64())
                    .map(|v| v as usize)
                    .unwrap_or(0);

                let codec_name = stream
                    .get("codec_name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown");

                let language = stream
                    .get("tags")
                    .and_then(|t| t.get("language"))
                    .and_then(|l| l.as_str())
                    .map(|s| s.to_string());

                let title = stream
                    .get("tags")
                    .and_then(|t| t.get("title"))
                    .and_then(|l| l.as_str())
                    .map(|s| s.to_string());

                tracks.push(SubtitleTrack {
                    index,
                    codec_name: codec_name.to_string(),
                    language,
                    title,
                });
            }
        }

        Ok(tracks)
    }

    async fn extract_subtitle_track(
        &self,
        video: &Path,
        track_index: usize,
        output: &Path,
    ) -> Result<()> {
        if !video.exists() {
            return Err(anyhow!("Video file does not exist: {:?}", video));
        }

        let mut command = Command::new("ffmpeg");
        command.args([
            "-y",
            "-i",
            Self::path_arg(video),
            "-map",
            &format!("0:{}", track_index),
            "-c:s",
            "srt",
            Self::path_arg(output),
        ]);

        let result = run_bounded(command, self.timeout, "ffmpeg").await?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = filter_ffmpeg_stderr(&stderr);
            error!("Subtitle extraction failed: {}", filtered);
            return Err(anyhow!("ffmpeg extraction failed: {}", filtered));
        }

        if !FileManager::non_empty_file(output) {
            return Err(anyhow!(
                "Extracted file is empty — no subtitles found in track {}",
                track_index
            ));
        }

        Ok(())
    }

    async fn burn_subtitles(&self, video: &Path, subtitle: &Path, output: &Path) -> Result<()> {
        let mut command = Command::new("ffmpeg");
        command.args([
            "-i",
            Self::path_arg(video),
            "-vf",
            &format!("subtitles={}", Self::path_arg(subtitle)),
            "-c:a",
            "copy",
            "-y",
            Self::path_arg(output),
        ]);

        let result = run_bounded(command, self.timeout, "ffmpeg").await?;

        if !result.status.success() {
            return Err(anyhow!(
                "ffmpeg subtitle burn-in failed: {}",
                combined_diagnostic(&result)
            ));
        }

        if !FileManager::non_empty_file(output) {
            return Err(anyhow!("Burn-in produced no output at {:?}", output));
        }

        Ok(())
    }

    async fn thumbnail(&self, clip: &Path, output: &Path) -> Result<()> {
        let mut command = Command::new("ffmpeg");
        command.args([
            // Seek before input: one fast keyframe-accurate decode
            "-ss",
            "0.1",
            "-i",
            Self::path_arg(clip),
            "-vframes",
            "1",
            "-q:v",
            "2",
            "-vf",
            "scale=320:240",
            Self::path_arg(output),
            "-y",
        ]);

        let result = run_bounded(command, self.timeout, "ffmpeg").await?;

        if !result.status.success() {
            return Err(anyhow!(
                "ffmpeg thumbnail failed: {}",
                combined_diagnostic(&result)
            ));
        }

        if !FileManager::non_empty_file(output) {
            return Err(anyhow!("Thumbnail produced no output at {:?}", output));
        }

        Ok(())
    }
}
