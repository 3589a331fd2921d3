/*!
 * Tests for timecode parsing and subtitle document parsing
 */

use crate::common;
use anyhow::Result;
use vocaclip::subtitle_processor::{SubtitleCollection, TimeCode};

/// Test timecode parsing of a plain timestamp
#[test]
fn test_timecode_toSeconds_withValidTimestamp_shouldConvert() {
    assert_eq!(TimeCode::to_seconds("00:01:02,500"), 62.5);
    assert_eq!(TimeCode::to_seconds("00:00:00,000"), 0.0);
    assert_eq!(TimeCode::to_seconds("01:00:00,000"), 3600.0);
}

/// Test that both millisecond separators are accepted
#[test]
fn test_timecode_toSeconds_withDotSeparator_shouldConvert() {
    assert_eq!(TimeCode::to_seconds("00:01:02.500"), 62.5);
    assert_eq!(TimeCode::to_seconds("01:23:45.678"), 5025.678);
}

/// Test that surrounding whitespace is tolerated
#[test]
fn test_timecode_toSeconds_withSurroundingWhitespace_shouldConvert() {
    assert_eq!(TimeCode::to_seconds("  00:01:02,500 "), 62.5);
}

/// Malformed input returns zero, the documented lenient behavior
#[test]
fn test_timecode_toSeconds_withMalformedInput_shouldReturnZero() {
    assert_eq!(TimeCode::to_seconds("bad"), 0.0);
    assert_eq!(TimeCode::to_seconds(""), 0.0);
    assert_eq!(TimeCode::to_seconds("00:02"), 0.0);
    assert_eq!(TimeCode::to_seconds("00:aa:02,000"), 0.0);
    assert_eq!(TimeCode::to_seconds("1:2:3:4"), 0.0);
}

/// Hours are not capped at two digits
#[test]
fn test_timecode_toSeconds_withLongHoursField_shouldConvert() {
    assert_eq!(TimeCode::to_seconds("100:00:01,000"), 360001.0);
}

/// Serialization uses the transcoder's plain-seconds contract
#[test]
fn test_timecode_formatSeconds_shouldUseThreeDecimals() {
    assert_eq!(TimeCode::format_seconds(62.5), "62.500");
    assert_eq!(TimeCode::format_seconds(0.0), "0.000");
    assert_eq!(TimeCode::format_seconds(1.2345), "1.234");
}

/// Entry duration is derived from the window endpoints
#[test]
fn test_subtitleEntry_durationSecs_shouldSubtractEndpoints() {
    use vocaclip::subtitle_processor::SubtitleEntry;

    let entry = SubtitleEntry::new(1.0, 3.5, "Hello".to_string());
    assert_eq!(entry.duration_secs(), 2.5);

    // Malformed timestamps can produce inverted windows; validation, not
    // the entry itself, rejects them
    let inverted = SubtitleEntry::new(3.0, 0.0, "Bad".to_string());
    assert_eq!(inverted.duration_secs(), -3.0);
}

/// A single well-formed block yields exactly one entry
#[test]
fn test_parse_withSingleBlock_shouldYieldOneEntry() {
    let entries =
        SubtitleCollection::parse_srt_string("1\n00:00:01,000 --> 00:00:03,500\nHello world\n\n");

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].start_secs, 1.0);
    assert_eq!(entries[0].end_secs, 3.5);
    assert_eq!(entries[0].text, "Hello world");
}

/// Multiple text lines are concatenated with a single space
#[test]
fn test_parse_withMultiLineText_shouldJoinWithSpace() {
    let entries = SubtitleCollection::parse_srt_string(
        "1\n00:00:01,000 --> 00:00:02,000\nFirst line\nSecond line\n",
    );

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "First line Second line");
}

/// The index line is optional
#[test]
fn test_parse_withoutIndexLine_shouldStillYieldEntry() {
    let entries =
        SubtitleCollection::parse_srt_string("00:00:01,000 --> 00:00:02,000\nNo index here\n");

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "No index here");
}

/// Blocks missing a timing line are skipped silently
#[test]
fn test_parse_withBlockMissingTimingLine_shouldSkipBlock() {
    let content = "1\njust some text\n\n2\n00:00:05,000 --> 00:00:06,000\nKept\n";
    let entries = SubtitleCollection::parse_srt_string(content);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "Kept");
}

/// Blocks with a timing line but no text are skipped silently
#[test]
fn test_parse_withEmptyText_shouldSkipBlock() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\n\n\n2\n00:00:03,000 --> 00:00:04,000\nKept\n";
    let entries = SubtitleCollection::parse_srt_string(content);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "Kept");
}

/// Empty input yields an empty sequence, not an error
#[test]
fn test_parse_withEmptyInput_shouldYieldNoEntries() {
    assert!(SubtitleCollection::parse_srt_string("").is_empty());
    assert!(SubtitleCollection::parse_srt_string("\n\n\n").is_empty());
}

/// Entries keep document order, even when timestamps are not monotonic
#[test]
fn test_parse_withOutOfOrderTimestamps_shouldKeepDocumentOrder() {
    let content = "1\n00:00:10,000 --> 00:00:12,000\nLater\n\n2\n00:00:01,000 --> 00:00:03,000\nEarlier\n";
    let entries = SubtitleCollection::parse_srt_string(content);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text, "Later");
    assert_eq!(entries[1].text, "Earlier");
}

/// CRLF documents parse the same as LF documents
#[test]
fn test_parse_withCrlfLineEndings_shouldYieldEntries() {
    let content = "1\r\n00:00:01,000 --> 00:00:03,500\r\nHello world\r\n\r\n2\r\n00:00:05,000 --> 00:00:06,000\r\nBye\r\n";
    let entries = SubtitleCollection::parse_srt_string(content);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text, "Hello world");
    assert_eq!(entries[1].text, "Bye");
}

/// A malformed timestamp inside a block falls back to zero seconds
#[test]
fn test_parse_withMalformedTimestamp_shouldFallBackToZero() {
    let entries =
        SubtitleCollection::parse_srt_string("1\nbad --> 00:00:03,000\nStill parsed\n");

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].start_secs, 0.0);
    assert_eq!(entries[0].end_secs, 3.0);
}

/// Reading a sample file end to end
#[test]
fn test_parseSrtFile_withSampleFile_shouldYieldAllEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "sample.srt")?;

    let collection = SubtitleCollection::parse_srt_file(&path);

    assert_eq!(collection.entries.len(), 3);
    assert_eq!(collection.entries[0].text, "The cat sat on the mat.");
    assert_eq!(collection.entries[1].start_secs, 5.0);
    assert_eq!(collection.source_file, path);
    Ok(())
}

/// An unreadable file yields an empty collection, a video-level skip
#[test]
fn test_parseSrtFile_withMissingFile_shouldYieldEmptyCollection() {
    let collection = SubtitleCollection::parse_srt_file("/nonexistent/missing.srt");
    assert!(collection.is_empty());
}
