/*!
 * # vocaclip
 *
 * A Rust library for cutting source videos into short, independently
 * playable sub-clips keyed by vocabulary word or by sentence.
 *
 * ## Features
 *
 * - Subtitle acquisition with memoization: cached prepared file, embedded
 *   track extraction, speech-to-text fallback
 * - Optional hard-subtitled derivative videos
 * - Word-mode clips (one per deduplicated vocabulary word) and
 *   sentence-mode clips (one per subtitle entry, with per-word metadata
 *   fan-out)
 * - Clip-boundary validation against malformed timestamps
 * - Stream-copy and H.264 re-encode rendering via ffmpeg
 * - Thumbnail derivation per clip
 * - SQLite-backed clip metadata persistence
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Timecode and subtitle document parsing
 * - `subtitle_acquirer`: Cache/extract/transcribe acquisition state machine
 * - `extractor`: Clip candidate derivation and boundary validation
 * - `transcode`: Capability traits over the external tools:
 *   - `transcode::ffmpeg`: ffmpeg/ffprobe transcoder
 *   - `transcode::whisper`: whisper speech recognizer
 *   - `transcode::mock`: deterministic fakes for testing
 * - `pipeline`: Batch driver over a directory tree
 * - `database`: Clip metadata sink (SQLite)
 * - `file_utils`: File system operations and deterministic naming
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod database;
pub mod errors;
pub mod extractor;
pub mod file_utils;
pub mod language_utils;
pub mod pipeline;
pub mod subtitle_acquirer;
pub mod subtitle_processor;
pub mod transcode;

// Re-export main types for easier usage
pub use app_config::{Config, Granularity};
pub use database::{ClipRecord, MetadataSink, Repository};
pub use errors::{AppError, ClipError, FatalError};
pub use pipeline::{Pipeline, PipelineConfig, RunSummary};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry, TimeCode};
pub use transcode::{CodecMode, FfmpegTranscoder, SpeechRecognizer, Transcoder};
