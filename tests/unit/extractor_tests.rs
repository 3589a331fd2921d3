/*!
 * Tests for clip candidate derivation and boundary validation
 */

use std::path::{Path, PathBuf};

use vocaclip::app_config::Granularity;
use vocaclip::extractor::{
    extract_sentence_candidates, extract_word_candidates, fanout_words, slugify, validate_window,
};
use vocaclip::subtitle_processor::SubtitleEntry;

fn entry(start: f64, end: f64, text: &str) -> SubtitleEntry {
    SubtitleEntry::new(start, end, text.to_string())
}

/// Word extraction dedupes, lowercases and drops words of length <= 2
#[test]
fn test_wordExtraction_withSampleSentence_shouldFilterShortWords() {
    let entries = vec![entry(1.0, 3.5, "The cat sat on the mat.")];
    let candidates = extract_word_candidates(Path::new("/videos/lesson.mp4"), &entries);

    let words: Vec<&str> = candidates.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(words, vec!["the", "cat", "sat", "mat"]);
}

/// Extraction order is first-appearance order, stable across runs
#[test]
fn test_wordExtraction_withRepeatedWords_shouldKeepFirstAppearanceOrder() {
    let entries = vec![
        entry(1.0, 2.0, "Fast car"),
        entry(3.0, 4.0, "The car was fast"),
    ];
    let candidates = extract_word_candidates(Path::new("lesson.mp4"), &entries);

    let words: Vec<&str> = candidates.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(words, vec!["fast", "car", "the", "was"]);
}

/// Each word takes the window of the first entry containing it
#[test]
fn test_wordExtraction_withWordInTwoEntries_shouldUseFirstEntryWindow() {
    let entries = vec![
        entry(1.0, 2.0, "A fast car"),
        entry(10.0, 12.0, "Another fast train"),
    ];
    let candidates = extract_word_candidates(Path::new("lesson.mp4"), &entries);

    let fast = candidates.iter().find(|c| c.label == "fast").unwrap();
    assert_eq!(fast.start_secs, 1.0);
    assert_eq!(fast.end_secs, 2.0);

    // "train" only appears in the second entry
    let train = candidates.iter().find(|c| c.label == "train").unwrap();
    assert_eq!(train.start_secs, 10.0);
}

/// Word clip paths land next to the source video
#[test]
fn test_wordExtraction_outputPath_shouldDeriveFromVideoBaseName() {
    let entries = vec![entry(1.0, 2.0, "Hello")];
    let candidates = extract_word_candidates(Path::new("/media/lesson01.mp4"), &entries);

    assert_eq!(
        candidates[0].output_path,
        PathBuf::from("/media/lesson01_hello.mp4")
    );
}

/// Case-insensitive matching: tokens are lowercased before dedup
#[test]
fn test_wordExtraction_withMixedCase_shouldDedupeCaseInsensitively() {
    let entries = vec![entry(1.0, 2.0, "Cat CAT cat")];
    let candidates = extract_word_candidates(Path::new("lesson.mp4"), &entries);

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].label, "cat");
}

/// Sentence extraction produces one candidate per entry
#[test]
fn test_sentenceExtraction_withEntries_shouldProduceOneCandidateEach() {
    let entries = vec![
        entry(1.0, 3.0, "The cat sat."),
        entry(5.0, 8.0, "A fast car drove past."),
    ];
    let candidates =
        extract_sentence_candidates(Path::new("/media/lesson.mp4"), Path::new("/out"), &entries);

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].label, "The cat sat.");
    assert_eq!(
        candidates[0].output_path,
        PathBuf::from("/out/lesson_sentence_000_The_cat_sat.mp4")
    );
    assert_eq!(
        candidates[1].output_path,
        PathBuf::from("/out/lesson_sentence_001_A_fast_car_drove_past.mp4")
    );
}

/// All-punctuation entries are skipped, but keep their index slot
#[test]
fn test_sentenceExtraction_withEmptySlug_shouldSkipEntry() {
    let entries = vec![
        entry(1.0, 2.0, "♪ ♪ ♪"),
        entry(3.0, 4.0, "Real words"),
    ];
    let candidates =
        extract_sentence_candidates(Path::new("lesson.mp4"), Path::new("/out"), &entries);

    assert_eq!(candidates.len(), 1);
    assert_eq!(
        candidates[0].output_path,
        PathBuf::from("/out/lesson_sentence_001_Real_words.mp4")
    );
}

/// Slug building: markup stripped, punctuation dropped, spaces collapsed
#[test]
fn test_slugify_withMarkupAndPunctuation_shouldClean() {
    assert_eq!(slugify("<i>Hello,</i>   world!"), "Hello_world");
    assert_eq!(slugify("Don't stop"), "Don_t_stop");
    assert_eq!(slugify("...!?"), "");
}

/// Slugs truncate to 50 characters
#[test]
fn test_slugify_withLongText_shouldTruncate() {
    let long_text = "word ".repeat(30);
    let slug = slugify(&long_text);

    assert_eq!(slug.chars().count(), 50);
    assert!(slug.starts_with("word_word"));
}

/// Fan-out words use the lower length threshold (> 1)
#[test]
fn test_fanoutWords_shouldKeepTwoLetterWords() {
    let words = fanout_words("Go on a fast car");
    assert_eq!(words, vec!["go", "on", "fast", "car"]);
}

/// Fan-out words are distinct
#[test]
fn test_fanoutWords_withRepeats_shouldDeduplicate() {
    let words = fanout_words("car car CAR");
    assert_eq!(words, vec!["car"]);
}

/// Too-short duration is rejected in word mode
#[test]
fn test_validateWindow_withTinyDuration_shouldReject() {
    let result = validate_window("word", 10.0, 10.05, Granularity::Word);
    assert!(result.is_err());
    assert_eq!(result.unwrap_err().kind(), "invalid_duration");
}

/// Word-mode cap is 30 seconds
#[test]
fn test_validateWindow_withLongWordClip_shouldReject() {
    assert!(validate_window("word", 0.0, 35.0, Granularity::Word).is_err());
    assert!(validate_window("word", 0.0, 30.0, Granularity::Word).is_ok());
}

/// Sentence-mode cap is 60 seconds
#[test]
fn test_validateWindow_withLongSentenceClip_shouldUseSentenceCap() {
    assert!(validate_window("s", 5.0, 40.0, Granularity::Sentence).is_ok());
    assert!(validate_window("s", 5.0, 70.0, Granularity::Sentence).is_err());
}

/// Negative start and inverted windows are rejected
#[test]
fn test_validateWindow_withDegenerateWindows_shouldReject() {
    assert!(validate_window("w", -1.0, 2.0, Granularity::Word).is_err());
    assert!(validate_window("w", 5.0, 5.0, Granularity::Word).is_err());
    assert!(validate_window("w", 5.0, 4.0, Granularity::Word).is_err());
}

/// The zero-fallback of a malformed pair collapses to end <= start
#[test]
fn test_validateWindow_withBothTimestampsMalformed_shouldReject() {
    // Both fields parsed as 0.0
    assert!(validate_window("w", 0.0, 0.0, Granularity::Word).is_err());
}

/// Boundary acceptance: exactly the 0.1s floor passes
#[test]
fn test_validateWindow_atMinimumDuration_shouldAccept() {
    assert!(validate_window("w", 0.0, 0.1, Granularity::Word).is_ok());
}
