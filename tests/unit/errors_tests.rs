/*!
 * Tests for the closed clip error kinds
 */

use std::path::PathBuf;
use vocaclip::errors::{ClipError, FatalError};

/// Each error kind reports a stable machine-friendly name
#[test]
fn test_clipError_kind_shouldBeStable() {
    let unavailable = ClipError::SubtitleUnavailable {
        video: PathBuf::from("a.mp4"),
        reason: "nothing worked".to_string(),
    };
    assert_eq!(unavailable.kind(), "subtitle_unavailable");

    let invalid = ClipError::invalid_window("cat", 10.0, 10.05, "too short");
    assert_eq!(invalid.kind(), "invalid_duration");

    let transcode = ClipError::TranscodeFailed {
        output: PathBuf::from("a_cat.mp4"),
        diagnostic: "exit 1".to_string(),
    };
    assert_eq!(transcode.kind(), "transcode_failed");

    let persist = ClipError::PersistFailed {
        filename: "a_cat.mp4".to_string(),
        reason: "constraint".to_string(),
    };
    assert_eq!(persist.kind(), "persist_failed");
}

/// Diagnostics carry the structured payload in the display text
#[test]
fn test_clipError_display_shouldCarryPayload() {
    let invalid = ClipError::invalid_window("cat", 10.0, 10.05, "duration below floor");
    let message = invalid.to_string();

    assert!(message.contains("cat"));
    assert!(message.contains("10.000"));
    assert!(message.contains("duration below floor"));
}

/// Fatal errors name what made the run abort
#[test]
fn test_fatalError_display_shouldNameCause() {
    let sink = FatalError::SinkUnavailable("disk full".to_string());
    assert!(sink.to_string().contains("disk full"));

    let missing = FatalError::SourceDirNotFound(PathBuf::from("/nope"));
    assert!(missing.to_string().contains("/nope"));
}
