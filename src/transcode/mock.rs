/*!
 * Mock transcoder and recognizer implementations for testing.
 *
 * These simulate the external tools deterministically:
 * - `MockTranscoder::working()` - renders fake clip files, succeeds
 * - `MockTranscoder::failing_clips()` - clip rendering always fails
 * - `MockTranscoder::failing_thumbnails()` - only thumbnail derivation fails
 * - `MockRecognizer::with_subtitle(...)` - "transcribes" a canned document
 * - `MockRecognizer::failing()` - speech-to-text always fails
 */

// Allow dead code - mocks are consumed by the test suite, not the binary
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use super::{CodecMode, SpeechRecognizer, SubtitleTrack, Transcoder};
use crate::file_utils::FileManager;
use crate::subtitle_processor::TimeCode;

/// Behavior mode for the mock transcoder
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// All operations succeed, writing small fake output files
    Working,
    /// Clip rendering fails; everything else succeeds
    FailingClips,
    /// Thumbnail derivation fails; everything else succeeds
    FailingThumbnails,
    /// Every operation fails
    Failing,
}

/// Deterministic stand-in for the external transcoding tool
#[derive(Debug)]
pub struct MockTranscoder {
    /// Behavior mode
    behavior: MockBehavior,
    /// Subtitle tracks reported by the probe
    tracks: Vec<SubtitleTrack>,
    /// SRT document "embedded" in every probed video, if any
    embedded_srt: Option<String>,
    /// Number of clip renders attempted
    clip_count: AtomicUsize,
    /// Number of thumbnail derivations attempted
    thumbnail_count: AtomicUsize,
    /// Number of burn-in invocations attempted
    burn_count: AtomicUsize,
}

impl MockTranscoder {
    /// Create a mock with the specified behavior and no embedded subtitles
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            tracks: Vec::new(),
            embedded_srt: None,
            clip_count: AtomicUsize::new(0),
            thumbnail_count: AtomicUsize::new(0),
            burn_count: AtomicUsize::new(0),
        }
    }

    /// Fully working mock without embedded subtitle tracks
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Mock whose clip renders always fail
    pub fn failing_clips() -> Self {
        Self::new(MockBehavior::FailingClips)
    }

    /// Mock whose thumbnail derivations always fail
    pub fn failing_thumbnails() -> Self {
        Self::new(MockBehavior::FailingThumbnails)
    }

    /// Mock where every operation fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Give every probed video one embedded text subtitle track carrying
    /// the provided SRT document
    pub fn with_embedded_srt(mut self, srt: &str, language: &str) -> Self {
        self.tracks = vec![SubtitleTrack {
            index: 2,
            codec_name: "subrip".to_string(),
            language: Some(language.to_string()),
            title: None,
        }];
        self.embedded_srt = Some(srt.to_string());
        self
    }

    /// Number of clip renders attempted so far
    pub fn clip_calls(&self) -> usize {
        self.clip_count.load(Ordering::Relaxed)
    }

    /// Number of thumbnail derivations attempted so far
    pub fn thumbnail_calls(&self) -> usize {
        self.thumbnail_count.load(Ordering::Relaxed)
    }

    /// Number of burn-in invocations attempted so far
    pub fn burn_calls(&self) -> usize {
        self.burn_count.load(Ordering::Relaxed)
    }

    fn fails_everything(&self) -> bool {
        self.behavior == MockBehavior::Failing
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    async fn clip(
        &self,
        source: &Path,
        start_secs: f64,
        duration_secs: f64,
        output: &Path,
        mode: CodecMode,
    ) -> Result<()> {
        self.clip_count.fetch_add(1, Ordering::Relaxed);

        if self.fails_everything() || self.behavior == MockBehavior::FailingClips {
            return Err(anyhow!("mock clip failure for {:?}", output));
        }

        // Content depends on codec mode so a re-encode pass over the same
        // path produces a different file size, as the real tool would
        let content = format!(
            "{} {} {} {:?}\n",
            mode,
            TimeCode::format_seconds(start_secs),
            TimeCode::format_seconds(duration_secs),
            source
        );
        FileManager::write_to_file(output, &content)?;
        Ok(())
    }

    async fn list_subtitle_tracks(&self, _video: &Path) -> Result<Vec<SubtitleTrack>> {
        if self.fails_everything() {
            return Err(anyhow!("mock probe failure"));
        }
        Ok(self.tracks.clone())
    }

    async fn extract_subtitle_track(
        &self,
        _video: &Path,
        track_index: usize,
        output: &Path,
    ) -> Result<()> {
        if self.fails_everything() {
            return Err(anyhow!("mock extraction failure"));
        }

        match &self.embedded_srt {
            Some(srt) => {
                FileManager::write_to_file(output, srt)?;
                Ok(())
            }
            None => Err(anyhow!("no subtitles found in track {}", track_index)),
        }
    }

    async fn burn_subtitles(&self, video: &Path, subtitle: &Path, output: &Path) -> Result<()> {
        self.burn_count.fetch_add(1, Ordering::Relaxed);

        if self.fails_everything() {
            return Err(anyhow!("mock burn-in failure"));
        }

        let content = format!("hardsub {:?} {:?}\n", video, subtitle);
        FileManager::write_to_file(output, &content)?;
        Ok(())
    }

    async fn thumbnail(&self, clip: &Path, output: &Path) -> Result<()> {
        self.thumbnail_count.fetch_add(1, Ordering::Relaxed);

        if self.fails_everything() || self.behavior == MockBehavior::FailingThumbnails {
            return Err(anyhow!("mock thumbnail failure for {:?}", clip));
        }

        FileManager::write_to_file(output, "jpeg\n")?;
        Ok(())
    }
}

/// Deterministic stand-in for the external speech-to-text tool
#[derive(Debug)]
pub struct MockRecognizer {
    /// SRT document the mock "transcribes"; None makes every request fail
    subtitle: Option<String>,
    /// Number of transcription requests
    transcribe_count: AtomicUsize,
}

impl MockRecognizer {
    /// Recognizer that always produces the given SRT document
    pub fn with_subtitle(srt: &str) -> Self {
        Self {
            subtitle: Some(srt.to_string()),
            transcribe_count: AtomicUsize::new(0),
        }
    }

    /// Recognizer that always fails
    pub fn failing() -> Self {
        Self {
            subtitle: None,
            transcribe_count: AtomicUsize::new(0),
        }
    }

    /// Number of transcription requests so far
    pub fn transcribe_calls(&self) -> usize {
        self.transcribe_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn transcribe(&self, video: &Path, output_dir: &Path) -> Result<PathBuf> {
        self.transcribe_count.fetch_add(1, Ordering::Relaxed);

        match &self.subtitle {
            Some(srt) => {
                // Mirror the real tool: output named after the input video
                let produced = output_dir.join(format!("{}.srt", FileManager::base_name(video)));
                FileManager::write_to_file(&produced, srt)?;
                Ok(produced)
            }
            None => Err(anyhow!("mock recognizer failure for {:?}", video)),
        }
    }
}
