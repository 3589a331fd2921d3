use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

// @module: Subtitle timecode and document parsing

// @const: All-digits index line
static INDEX_LINE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

// @const: Blank-line block separator, CRLF tolerant
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// SRT timecode conversion between `H+:MM:SS[,.]mmm` strings and seconds.
pub struct TimeCode;

impl TimeCode {
    /// Parse a subtitle timestamp into seconds.
    ///
    /// Accepts both comma and dot millisecond separators and tolerates
    /// surrounding whitespace. Malformed input (wrong field count or a
    /// non-numeric component) returns `0.0` and logs a warning instead of
    /// failing the caller; degenerate windows produced this way are caught
    /// by clip-boundary validation downstream.
    pub fn to_seconds(timestamp: &str) -> f64 {
        let normalized = timestamp.trim().replace(',', ".");

        let parts: Vec<&str> = normalized.split(':').collect();
        if parts.len() != 3 {
            warn!("Malformed timestamp (expected H:MM:SS,mmm): {}", timestamp);
            return 0.0;
        }

        let hours: f64 = match parts[0].parse() {
            Ok(v) => v,
            Err(_) => {
                warn!("Malformed hours component in timestamp: {}", timestamp);
                return 0.0;
            }
        };
        let minutes: f64 = match parts[1].parse() {
            Ok(v) => v,
            Err(_) => {
                warn!("Malformed minutes component in timestamp: {}", timestamp);
                return 0.0;
            }
        };
        let seconds: f64 = match parts[2].parse() {
            Ok(v) => v,
            Err(_) => {
                warn!("Malformed seconds component in timestamp: {}", timestamp);
                return 0.0;
            }
        };

        hours * 3600.0 + minutes * 60.0 + seconds
    }

    /// Format a seconds value the way the transcoder argument contract
    /// expects (`-ss`/`-t` take plain fractional seconds).
    pub fn format_seconds(seconds: f64) -> String {
        format!("{:.3}", seconds)
    }
}

// @struct: Single timed subtitle entry
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Start time in seconds
    pub start_secs: f64,

    // @field: End time in seconds
    pub end_secs: f64,

    // @field: Subtitle text, display lines joined with a single space
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(start_secs: f64, end_secs: f64, text: String) -> Self {
        SubtitleEntry {
            start_secs,
            end_secs,
            text,
        }
    }

    /// Window length in seconds. May be zero or negative for entries with
    /// malformed timestamps; `end > start` is enforced by validation, not here.
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{} --> {}] {}",
            TimeCode::format_seconds(self.start_secs),
            TimeCode::format_seconds(self.end_secs),
            self.text
        )
    }
}

/// Parsed subtitle document tied to its source file
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source subtitle filename
    pub source_file: PathBuf,

    /// Entries in document order (not guaranteed monotonic or non-overlapping)
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Parse a subtitle file into timed entries.
    ///
    /// Unreadable input yields an empty collection, which callers treat as
    /// "no usable subtitle" (a video-level skip, never a batch failure).
    pub fn parse_srt_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Cannot read subtitle file {:?}: {}", path, e);
                String::new()
            }
        };

        let entries = Self::parse_srt_string(&content);
        debug!("Parsed {} entries from {:?}", entries.len(), path);

        SubtitleCollection {
            source_file: path.to_path_buf(),
            entries,
        }
    }

    /// Parse SRT document text into timed entries.
    ///
    /// The document is a sequence of blocks separated by blank lines. A block
    /// holds an optional all-digits index line (discarded), exactly one
    /// timing line containing `-->`, and one or more text lines joined with
    /// a single space. Blocks missing a timing line or whose text is empty
    /// are skipped silently.
    pub fn parse_srt_string(content: &str) -> Vec<SubtitleEntry> {
        let mut entries = Vec::new();

        for block in BLOCK_SEPARATOR_REGEX.split(content) {
            let lines: Vec<&str> = block
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect();
            if lines.is_empty() {
                continue;
            }

            let Some(timing_pos) = lines.iter().position(|line| line.contains("-->")) else {
                continue;
            };

            // Anything before the timing line other than the index is noise
            if timing_pos > 0 && !INDEX_LINE_REGEX.is_match(lines[0]) {
                debug!("Unexpected line before timing line: {}", lines[0]);
            }

            let (start, end) = match lines[timing_pos].split_once("-->") {
                Some((start, end)) => (TimeCode::to_seconds(start), TimeCode::to_seconds(end)),
                None => continue,
            };

            let text = lines[timing_pos + 1..].join(" ");
            if text.is_empty() {
                continue;
            }

            entries.push(SubtitleEntry::new(start, end, text));
        }

        entries
    }

    /// Whether the collection carries any usable entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
