/*!
 * Tests for app configuration functionality
 */

use std::str::FromStr;
use vocaclip::app_config::{Config, Granularity, LogLevel};

/// Defaults match the documented configuration surface
#[test]
fn test_config_default_shouldCarryDocumentedValues() {
    let config = Config::default();

    assert!(config.accepted_extensions.contains(&"mp4".to_string()));
    assert!(config.accepted_extensions.contains(&"mkv".to_string()));
    assert_eq!(config.subtitle_language, "en");
    assert_eq!(config.recognizer_model, "base");
    assert!(config.hard_sub_derivative);
    assert_eq!(config.transcode_timeout_secs, 120);
    assert_eq!(config.recognizer_timeout_secs, 3600);
    assert!(config.database_path.is_none());
    assert_eq!(config.log_level, LogLevel::Info);
}

/// The default configuration validates
#[test]
fn test_config_default_shouldValidate() {
    assert!(Config::default().validate().is_ok());
}

/// An unknown subtitle language fails validation
#[test]
fn test_config_validate_withInvalidLanguage_shouldFail() {
    let config = Config {
        subtitle_language: "xx".to_string(),
        ..Config::default()
    };

    assert!(config.validate().is_err());
}

/// Empty extension set fails validation
#[test]
fn test_config_validate_withNoExtensions_shouldFail() {
    let config = Config {
        accepted_extensions: Vec::new(),
        ..Config::default()
    };

    assert!(config.validate().is_err());
}

/// Zero timeouts fail validation
#[test]
fn test_config_validate_withZeroTimeout_shouldFail() {
    let config = Config {
        transcode_timeout_secs: 0,
        ..Config::default()
    };

    assert!(config.validate().is_err());
}

/// An empty JSON document deserializes to the defaults
#[test]
fn test_config_fromEmptyJson_shouldUseDefaults() {
    let config: Config = serde_json::from_str("{}").expect("Failed to parse empty config");

    assert_eq!(config.subtitle_language, "en");
    assert_eq!(config.transcode_timeout_secs, 120);
}

/// Partial JSON overrides only the given fields
#[test]
fn test_config_fromPartialJson_shouldOverrideGivenFields() {
    let config: Config =
        serde_json::from_str(r#"{"subtitle_language": "fr", "hard_sub_derivative": false}"#)
            .expect("Failed to parse partial config");

    assert_eq!(config.subtitle_language, "fr");
    assert!(!config.hard_sub_derivative);
    assert_eq!(config.recognizer_model, "base");
}

/// Round trip through serde keeps the configuration intact
#[test]
fn test_config_serdeRoundTrip_shouldPreserveValues() {
    let mut config = Config::default();
    config.subtitle_language = "de".to_string();
    config.recognizer_model = "small".to_string();

    let json = serde_json::to_string(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.subtitle_language, "de");
    assert_eq!(parsed.recognizer_model, "small");
}

/// Granularity parses from its lowercase names
#[test]
fn test_granularity_fromStr_shouldParseBothModes() {
    assert_eq!(Granularity::from_str("word").unwrap(), Granularity::Word);
    assert_eq!(
        Granularity::from_str("SENTENCE").unwrap(),
        Granularity::Sentence
    );
    assert!(Granularity::from_str("paragraph").is_err());
}

/// Duration caps differ by granularity mode
#[test]
fn test_granularity_maxClipSecs_shouldDifferByMode() {
    assert_eq!(Granularity::Word.max_clip_secs(), 30.0);
    assert_eq!(Granularity::Sentence.max_clip_secs(), 60.0);
}

/// Display names round-trip through FromStr
#[test]
fn test_granularity_display_shouldRoundTrip() {
    for mode in [Granularity::Word, Granularity::Sentence] {
        let parsed = Granularity::from_str(&mode.to_string()).unwrap();
        assert_eq!(parsed, mode);
    }
}
