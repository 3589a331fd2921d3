use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::app_config::Granularity;
use crate::errors::ClipError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::transcode::{SpeechRecognizer, SubtitleTrack, Transcoder};

// @module: Subtitle acquisition state machine

/// Obtains a usable subtitle document for a video, trying in order:
///
/// 1. the cached prepared file at `<base>_prepared.srt`, or a pre-supplied
///    `<base>.srt` sidecar
/// 2. extraction of an embedded subtitle track
/// 3. speech-to-text over the video's audio
///
/// Speech-to-text is the expensive path; the prepared file memoizes it so
/// repeated runs over the same directory are cheap. After a successful
/// transcription the acquirer can also render a hard-subtitled derivative
/// video (word mode replaces the source, keeping a backup; sentence mode
/// writes a `_with_srt` sibling and leaves the source untouched).
pub struct SubtitleAcquirer<'a> {
    transcoder: &'a dyn Transcoder,
    recognizer: &'a dyn SpeechRecognizer,
    /// Preferred language for embedded track selection
    preferred_language: String,
    /// Whether to render the hard-subtitled derivative after transcription
    hard_sub_derivative: bool,
}

impl<'a> SubtitleAcquirer<'a> {
    /// Create an acquirer over the given tool capabilities
    pub fn new(
        transcoder: &'a dyn Transcoder,
        recognizer: &'a dyn SpeechRecognizer,
        preferred_language: &str,
        hard_sub_derivative: bool,
    ) -> Self {
        Self {
            transcoder,
            recognizer,
            preferred_language: preferred_language.to_string(),
            hard_sub_derivative,
        }
    }

    /// Run the acquisition state machine once for a video.
    ///
    /// Returns the path of the prepared subtitle file, or
    /// `ClipError::SubtitleUnavailable` when every strategy failed (a
    /// video-level skip for the caller).
    pub async fn acquire(&self, video: &Path, mode: Granularity) -> Result<PathBuf, ClipError> {
        let prepared = FileManager::prepared_subtitle_path(video);

        // Strategy 1: memoized result of an earlier run
        if FileManager::non_empty_file(&prepared) {
            info!("Using cached subtitle file: {:?}", prepared);
            return Ok(prepared);
        }

        // A pre-supplied sidecar subtitle beats both external tools
        let sidecar = FileManager::default_subtitle_path(video);
        if FileManager::non_empty_file(&sidecar) {
            info!("Using pre-supplied subtitle file: {:?}", sidecar);
            return Ok(sidecar);
        }

        // Strategy 2: embedded subtitle track
        match self.extract_embedded(video, &prepared).await {
            Ok(()) => {
                info!("Extracted embedded subtitle: {:?}", prepared);
                return Ok(prepared);
            }
            Err(embedded_err) => {
                debug!("Embedded extraction unavailable for {:?}: {}", video, embedded_err);

                // Strategy 3: speech-to-text
                match self.transcribe(video, &prepared).await {
                    Ok(()) => {
                        info!("Generated subtitle via speech-to-text: {:?}", prepared);

                        if self.hard_sub_derivative {
                            // Derivative failure never loses the subtitle we just made
                            if let Err(e) = self.render_hard_sub(video, &prepared, mode).await {
                                warn!("Hard-subtitle derivative failed for {:?}: {}", video, e);
                            }
                        }

                        Ok(prepared)
                    }
                    Err(stt_err) => Err(ClipError::SubtitleUnavailable {
                        video: video.to_path_buf(),
                        reason: format!("embedded: {}; speech-to-text: {}", embedded_err, stt_err),
                    }),
                }
            }
        }
    }

    /// Extract the best embedded text subtitle track to the prepared path
    async fn extract_embedded(&self, video: &Path, prepared: &Path) -> Result<()> {
        let tracks = self.transcoder.list_subtitle_tracks(video).await?;

        if tracks.is_empty() {
            anyhow::bail!("no subtitle tracks found in the video");
        }

        let text_tracks: Vec<&SubtitleTrack> = tracks.iter().filter(|t| !t.is_bitmap()).collect();
        if text_tracks.is_empty() {
            anyhow::bail!(
                "all {} subtitle tracks are bitmap-based and cannot be converted to text",
                tracks.len()
            );
        }

        let bitmap_count = tracks.len() - text_tracks.len();
        if bitmap_count > 0 {
            warn!(
                "Skipping {} bitmap subtitle track(s), only text-based tracks can be extracted",
                bitmap_count
            );
        }

        let track_index = Self::select_track(&text_tracks, &self.preferred_language)
            .context("no suitable text subtitle track")?;

        self.transcoder
            .extract_subtitle_track(video, track_index, prepared)
            .await
    }

    /// Select a subtitle track based on preferred language.
    ///
    /// Order of preference: language-tag match, title mentioning the
    /// language name or code, an English track, then the first track.
    fn select_track(tracks: &[&SubtitleTrack], preferred_language: &str) -> Option<usize> {
        for track in tracks {
            if let Some(track_lang) = &track.language {
                if language_utils::language_codes_match(track_lang, preferred_language) {
                    return Some(track.index);
                }
            }

            if let Some(title) = &track.title {
                let title_lower = title.to_lowercase();

                if let Ok(pref_name) = language_utils::get_language_name(preferred_language) {
                    if title_lower.contains(&pref_name.to_lowercase()) {
                        return Some(track.index);
                    }
                }

                if title_lower.contains(&preferred_language.to_lowercase()) {
                    return Some(track.index);
                }
            }
        }

        // Fall back to English when the preferred language is absent
        if !language_utils::language_codes_match(preferred_language, "en") {
            for track in tracks {
                if let Some(lang) = &track.language {
                    if language_utils::language_codes_match(lang, "en") {
                        return Some(track.index);
                    }
                }

                if let Some(title) = &track.title {
                    if title.to_lowercase().contains("english") {
                        return Some(track.index);
                    }
                }
            }
        }

        tracks.first().map(|t| t.index)
    }

    /// Run speech-to-text and rename the tool-default output file into place
    async fn transcribe(&self, video: &Path, prepared: &Path) -> Result<()> {
        let output_dir = FileManager::parent_dir(video);
        let produced = self.recognizer.transcribe(video, &output_dir).await?;

        if produced != prepared {
            fs::rename(&produced, prepared).with_context(|| {
                format!("failed to rename {:?} to {:?}", produced, prepared)
            })?;
        }

        Ok(())
    }

    /// Render the hard-subtitled derivative for a freshly transcribed video.
    ///
    /// The burn-in writes to a temp file first; only the word-granularity
    /// pipeline replaces the source (keeping `<source>.backup`), the
    /// sentence pipeline writes a `_with_srt` sibling instead.
    async fn render_hard_sub(
        &self,
        video: &Path,
        subtitle: &Path,
        mode: Granularity,
    ) -> Result<()> {
        let dir = FileManager::parent_dir(video);
        let temp = tempfile::Builder::new()
            .prefix(".hardsub-")
            .suffix(".mp4")
            .tempfile_in(&dir)
            .context("failed to create temp file for burn-in")?;

        self.transcoder
            .burn_subtitles(video, subtitle, temp.path())
            .await?;

        match mode {
            Granularity::Word => {
                let backup = FileManager::backup_path(video);
                fs::rename(video, &backup)
                    .with_context(|| format!("failed to back up source to {:?}", backup))?;
                temp.persist(video)
                    .map_err(|e| anyhow::anyhow!("failed to replace source {:?}: {}", video, e))?;
                info!("Hard-subtitled derivative replaced source: {:?}", video);
            }
            Granularity::Sentence => {
                let sibling = FileManager::hard_sub_sibling_path(video);
                temp.persist(&sibling)
                    .map_err(|e| anyhow::anyhow!("failed to write derivative {:?}: {}", sibling, e))?;
                info!("Hard-subtitled derivative written: {:?}", sibling);
            }
        }

        Ok(())
    }
}
