/*!
 * Error types for the vocaclip application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while producing a single clip.
///
/// These are the closed item-level and video-level failure kinds of the
/// pipeline; everything here is recoverable (the batch continues).
#[derive(Error, Debug)]
pub enum ClipError {
    /// No subtitle could be obtained for a video by any acquisition strategy
    #[error("no usable subtitle for {video:?}: {reason}")]
    SubtitleUnavailable {
        /// The video that could not be processed
        video: PathBuf,
        /// Why the last acquisition strategy gave up
        reason: String,
    },

    /// A candidate clip window failed boundary validation
    #[error("invalid clip window [{start:.3}, {end:.3}) for {label}: {reason}")]
    InvalidDuration {
        /// Candidate label (word or sentence slug)
        label: String,
        /// Window start in seconds
        start: f64,
        /// Window end in seconds
        end: f64,
        /// Which boundary check rejected the window
        reason: String,
    },

    /// The external transcoder failed or produced an empty output file
    #[error("transcode failed for {output:?}: {diagnostic}")]
    TranscodeFailed {
        /// Intended output file
        output: PathBuf,
        /// Combined process output, filtered of banner noise
        diagnostic: String,
    },

    /// The metadata sink rejected the record
    #[error("failed to persist record for {filename}: {reason}")]
    PersistFailed {
        /// Clip filename the record described
        filename: String,
        /// Sink-reported reason
        reason: String,
    },
}

impl ClipError {
    /// Build an `InvalidDuration` error from a rejected window.
    pub fn invalid_window(label: &str, start: f64, end: f64, reason: &str) -> Self {
        ClipError::InvalidDuration {
            label: label.to_string(),
            start,
            end,
            reason: reason.to_string(),
        }
    }

    /// Short machine-friendly kind name, used in diagnostics and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            ClipError::SubtitleUnavailable { .. } => "subtitle_unavailable",
            ClipError::InvalidDuration { .. } => "invalid_duration",
            ClipError::TranscodeFailed { .. } => "transcode_failed",
            ClipError::PersistFailed { .. } => "persist_failed",
        }
    }
}

/// Fatal errors that abort the whole batch run.
#[derive(Error, Debug)]
pub enum FatalError {
    /// Required output directory could not be created
    #[error("cannot create output directory {dir:?}: {source}")]
    OutputDirUnavailable {
        /// The directory that could not be created
        dir: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The metadata sink could not be opened
    #[error("cannot open metadata sink: {0}")]
    SinkUnavailable(String),

    /// The source directory does not exist or is not a directory
    #[error("source directory not found: {0:?}")]
    SourceDirNotFound(PathBuf),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Fatal pipeline error
    #[error("Fatal error: {0}")]
    Fatal(#[from] FatalError),

    /// Recoverable clip error surfaced at the application boundary
    #[error("Clip error: {0}")]
    Clip(#[from] ClipError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
