/*!
 * Clip metadata record.
 *
 * One record describes one persisted clip file. Records are created once,
 * immediately after a file-stat of the rendered output, and never mutated;
 * their lifecycle ends only by deletion outside this core.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Persisted metadata for one produced clip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipRecord {
    /// Database id, assigned by the sink (0 before persistence)
    pub id: i64,
    /// Clip filename (no directory)
    pub filename: String,
    /// Clip file location; the file exists with `file_size` bytes at
    /// creation time
    pub file_url: String,
    /// File size in bytes at creation time
    pub file_size: i64,
    /// Clip duration in whole seconds, always positive
    pub duration_secs: i64,
    /// Container format
    pub format: String,
    /// Vocabulary word this clip is keyed by (word mode)
    pub word: Option<String>,
    /// Full sentence text (sentence mode fan-out)
    pub sentence: Option<String>,
    /// Thumbnail file location, empty when derivation failed
    pub thumbnail: Option<String>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

impl ClipRecord {
    /// Build a record for a rendered clip file.
    ///
    /// `duration_secs` is the ceiling of the window length so every window
    /// the validator accepts (>= 0.1 s) maps to a positive integer.
    pub fn new(file_url: &Path, file_size: i64, window_secs: f64) -> Self {
        let filename = file_url
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            id: 0, // Will be assigned by the sink
            filename,
            file_url: file_url.to_string_lossy().to_string(),
            file_size,
            duration_secs: window_secs.ceil() as i64,
            format: "mp4".to_string(),
            word: None,
            sentence: None,
            thumbnail: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Key the record by a vocabulary word (word mode)
    pub fn with_word(mut self, word: &str) -> Self {
        self.word = Some(word.to_string());
        self
    }

    /// Attach the sentence text (sentence mode fan-out)
    pub fn with_sentence(mut self, sentence: &str) -> Self {
        self.sentence = Some(sentence.to_string());
        self
    }

    /// Attach the thumbnail location
    pub fn with_thumbnail(mut self, thumbnail: Option<&Path>) -> Self {
        self.thumbnail = thumbnail.map(|p| p.to_string_lossy().to_string());
        self
    }
}

impl fmt::Display for ClipRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} bytes, {}s)",
            self.filename, self.file_size, self.duration_secs
        )
    }
}
