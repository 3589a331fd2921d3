use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::{debug, info};
use tokio::process::Command;

use super::{SpeechRecognizer, run_bounded};
use crate::file_utils::FileManager;

// @module: whisper-backed speech recognizer

/// Speech recognizer invoking the external whisper tool.
///
/// The tool writes its subtitle to `<output_dir>/<videoBase>.srt`; the
/// caller is responsible for renaming that to the deterministic cache path.
#[derive(Debug, Clone)]
pub struct WhisperRecognizer {
    /// Model size passed via `--model`
    model: String,
    /// Language hint passed via `--language`, autodetected when None
    language: Option<String>,
    /// Bounded execution budget per invocation
    timeout: Duration,
}

impl WhisperRecognizer {
    /// Create a recognizer with the given model size and timeout
    pub fn new(model: &str, timeout_secs: u64) -> Self {
        Self {
            model: model.to_string(),
            language: None,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Set the language hint instead of autodetection
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperRecognizer {
    async fn transcribe(&self, video: &Path, output_dir: &Path) -> Result<PathBuf> {
        info!("Transcribing {:?} with whisper ({})", video, self.model);

        let mut command = Command::new("whisper");
        command.arg(video);
        command.args([
            "--output_format",
            "srt",
            "--output_dir",
            output_dir.to_str().unwrap_or_default(),
            "--model",
            &self.model,
        ]);
        if let Some(language) = &self.language {
            command.args(["--language", language]);
        }

        let output = run_bounded(command, self.timeout, "whisper").await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("whisper failed: {}", stderr.trim()));
        }

        // The tool names its output after the input video
        let produced = output_dir.join(format!("{}.srt", FileManager::base_name(video)));
        if !FileManager::non_empty_file(&produced) {
            return Err(anyhow!(
                "whisper exited cleanly but produced no subtitle at {:?}",
                produced
            ));
        }

        debug!("whisper wrote {:?}", produced);
        Ok(produced)
    }
}

/// Recognizer used when no speech-to-text tool is configured: every
/// transcription request fails, so acquisition falls through to the
/// video-level skip.
#[derive(Debug, Clone, Default)]
pub struct NullRecognizer;

#[async_trait]
impl SpeechRecognizer for NullRecognizer {
    async fn transcribe(&self, video: &Path, _output_dir: &Path) -> Result<PathBuf> {
        Err(anyhow!(
            "speech recognizer unavailable, cannot transcribe {:?}",
            video
        ))
    }
}
