use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::Granularity;
use crate::errors::ClipError;
use crate::file_utils::FileManager;
use crate::subtitle_processor::SubtitleEntry;

// @module: Clip candidate derivation from parsed subtitles

// @const: ASCII letter run, the vocabulary token pattern
static WORD_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").unwrap());

// @const: HTML-like markup inside subtitle text
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

// @const: Everything a slug may not contain
static NON_SLUG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9 ]").unwrap());

/// Words shorter than this never get their own clip; "a", "of", "it" and
/// friends carry no vocabulary value.
const WORD_CLIP_MIN_LEN: usize = 3;

/// Fan-out metadata indexes nearly every word, so its floor sits one lower
/// than the clip-window floor. Kept as two distinct constants on purpose.
const FANOUT_MIN_LEN: usize = 2;

/// Maximum slug length in sentence-clip filenames
const SLUG_MAX_LEN: usize = 50;

/// Minimum accepted clip duration in seconds, guarding against zero-length
/// artifacts from adjacent or duplicated timestamps
const MIN_CLIP_SECS: f64 = 0.1;

/// One candidate clip, consumed by validation and rendering then discarded
#[derive(Debug, Clone)]
pub struct ClipCandidate {
    /// Word or full sentence text this clip is keyed by
    pub label: String,
    /// Window start in seconds
    pub start_secs: f64,
    /// Window end in seconds
    pub end_secs: f64,
    /// Deterministic output path for the rendered clip
    pub output_path: PathBuf,
}

impl ClipCandidate {
    /// Window length in seconds
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

/// Derive word-mode candidates: one clip per deduplicated vocabulary word.
///
/// Tokens are ASCII letter runs, lowercased, filtered to length > 2. Each
/// surviving word takes the window of the *first* entry that contains it,
/// and words keep their first-appearance order so repeated runs extract
/// identically. Output paths land next to the source video.
pub fn extract_word_candidates(video: &Path, entries: &[SubtitleEntry]) -> Vec<ClipCandidate> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    for entry in entries {
        for token in WORD_TOKEN_REGEX.find_iter(&entry.text) {
            let word = token.as_str().to_lowercase();
            if word.len() < WORD_CLIP_MIN_LEN {
                continue;
            }
            if !seen.insert(word.clone()) {
                continue;
            }

            // First entry containing the word defines its clip window
            candidates.push(ClipCandidate {
                output_path: FileManager::word_clip_path(video, &word),
                label: word,
                start_secs: entry.start_secs,
                end_secs: entry.end_secs,
            });
        }
    }

    debug!(
        "Extracted {} word candidates from {} entries",
        candidates.len(),
        entries.len()
    );
    candidates
}

/// Derive sentence-mode candidates: one clip per subtitle entry.
///
/// The entry text is slugified for the filename; entries whose slug comes
/// out empty (all punctuation) are skipped. Output paths land in the
/// caller-supplied output directory.
pub fn extract_sentence_candidates(
    video: &Path,
    output_dir: &Path,
    entries: &[SubtitleEntry],
) -> Vec<ClipCandidate> {
    let mut candidates = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let slug = slugify(&entry.text);
        if slug.is_empty() {
            debug!("Skipping entry {} with empty slug: {}", index, entry.text);
            continue;
        }

        candidates.push(ClipCandidate {
            label: entry.text.clone(),
            start_secs: entry.start_secs,
            end_secs: entry.end_secs,
            output_path: FileManager::sentence_clip_path(video, output_dir, index, &slug),
        });
    }

    debug!(
        "Extracted {} sentence candidates from {} entries",
        candidates.len(),
        entries.len()
    );
    candidates
}

/// Distinct words of a sentence for metadata fan-out, in first-appearance
/// order, filtered to length > 1.
pub fn fanout_words(text: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut words = Vec::new();

    for token in WORD_TOKEN_REGEX.find_iter(text) {
        let word = token.as_str().to_lowercase();
        if word.len() < FANOUT_MIN_LEN {
            continue;
        }
        if seen.insert(word.clone()) {
            words.push(word);
        }
    }

    words
}

/// Build a filename-safe slug from sentence text: markup stripped, only
/// alphanumerics and spaces kept, whitespace collapsed, spaces replaced
/// with underscores, truncated to 50 characters.
pub fn slugify(text: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(text, " ");
    let clean = NON_SLUG_REGEX.replace_all(&without_tags, " ");

    let slug: String = clean
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    slug.chars().take(SLUG_MAX_LEN).collect()
}

/// Enforce timing sanity on a candidate window before rendering.
///
/// Rejections are item-level: the caller logs the diagnostic and moves on
/// to the next candidate. The duration caps guard against windows built
/// from malformed timestamps (a `0.0` fallback start against a real end,
/// or vice versa, yields an absurd span).
pub fn validate_window(
    label: &str,
    start_secs: f64,
    end_secs: f64,
    mode: Granularity,
) -> Result<(), ClipError> {
    if start_secs < 0.0 {
        return Err(ClipError::invalid_window(
            label,
            start_secs,
            end_secs,
            "start time is negative",
        ));
    }

    if end_secs <= start_secs {
        return Err(ClipError::invalid_window(
            label,
            start_secs,
            end_secs,
            "end time is not after start time",
        ));
    }

    let duration = end_secs - start_secs;
    let max_secs = mode.max_clip_secs();

    if duration > max_secs {
        return Err(ClipError::invalid_window(
            label,
            start_secs,
            end_secs,
            &format!(
                "duration {:.1}s exceeds the {:.0}s cap for {} clips",
                duration, max_secs, mode
            ),
        ));
    }

    if duration < MIN_CLIP_SECS {
        return Err(ClipError::invalid_window(
            label,
            start_secs,
            end_secs,
            &format!("duration {:.3}s is below the {}s floor", duration, MIN_CLIP_SECS),
        ));
    }

    Ok(())
}
