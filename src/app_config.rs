use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Video file extensions accepted by the directory scan
    #[serde(default = "default_accepted_extensions")]
    pub accepted_extensions: Vec<String>,

    /// Preferred language (ISO code) for embedded subtitle track selection
    #[serde(default = "default_subtitle_language")]
    pub subtitle_language: String,

    /// Speech-to-text model size passed to the external tool
    #[serde(default = "default_recognizer_model")]
    pub recognizer_model: String,

    /// Whether to render a hard-subtitled derivative after speech-to-text
    #[serde(default = "default_true")]
    pub hard_sub_derivative: bool,

    /// Per-invocation budget for ffmpeg/ffprobe work, in seconds
    #[serde(default = "default_transcode_timeout_secs")]
    pub transcode_timeout_secs: u64,

    /// Per-invocation budget for speech-to-text, in seconds
    #[serde(default = "default_recognizer_timeout_secs")]
    pub recognizer_timeout_secs: u64,

    /// Metadata database path; None uses the per-user default location
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Clip granularity mode
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    // @mode: One clip per vocabulary word, output alongside sources
    #[default]
    Word,
    // @mode: One clip per subtitle sentence, output to a separate directory
    Sentence,
}

impl Granularity {
    // @returns: Maximum accepted clip duration for this mode, in seconds
    pub fn max_clip_secs(&self) -> f64 {
        match self {
            Self::Word => 30.0,
            Self::Sentence => 60.0,
        }
    }
}

// Implement Display trait for Granularity
impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Word => write!(f, "word"),
            Self::Sentence => write!(f, "sentence"),
        }
    }
}

// Implement FromStr trait for Granularity
impl std::str::FromStr for Granularity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "word" => Ok(Self::Word),
            "sentence" => Ok(Self::Sentence),
            _ => Err(anyhow!("Invalid granularity mode: {}", s)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_accepted_extensions() -> Vec<String> {
    ["mp4", "avi", "mov", "mkv", "webm", "flv", "wmv"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_subtitle_language() -> String {
    "en".to_string()
}

fn default_recognizer_model() -> String {
    "base".to_string()
}

fn default_true() -> bool {
    true
}

fn default_transcode_timeout_secs() -> u64 {
    120
}

fn default_recognizer_timeout_secs() -> u64 {
    // Speech-to-text over a full-length video is slow; give it an hour
    3600
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.accepted_extensions.is_empty() {
            return Err(anyhow!("At least one accepted video extension is required"));
        }

        // Validate preferred subtitle language
        let _language_name = crate::language_utils::get_language_name(&self.subtitle_language)?;

        if self.transcode_timeout_secs == 0 || self.recognizer_timeout_secs == 0 {
            return Err(anyhow!("Invocation timeouts must be non-zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            accepted_extensions: default_accepted_extensions(),
            subtitle_language: default_subtitle_language(),
            recognizer_model: default_recognizer_model(),
            hard_sub_derivative: true,
            transcode_timeout_secs: default_transcode_timeout_secs(),
            recognizer_timeout_secs: default_recognizer_timeout_secs(),
            database_path: None,
            log_level: LogLevel::default(),
        }
    }
}
