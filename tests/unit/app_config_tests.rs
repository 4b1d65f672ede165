/*!
 * Tests for application configuration functionality
 */

use lingopair::alignment::{AlignmentStrategy, HighlightMarkers, ProperNounFilter};
use lingopair::app_config::{Config, LogLevel, TranslationFailurePolicy, TranslationProvider};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.timeout_secs, 30);
    assert_eq!(config.translation.retry_count, 3);

    assert_eq!(config.alignment.time_threshold, 0.5);
    assert_eq!(config.alignment.max_time, 60.0);
    assert_eq!(config.alignment.min_duration, 2.0);
    assert_eq!(config.alignment.min_keyword_length, 3);
    assert_eq!(config.alignment.strategy, AlignmentStrategy::FirstMatch);
    assert_eq!(config.alignment.proper_noun_filter, ProperNounFilter::Auto);
    assert_eq!(config.alignment.translation_failure_policy, TranslationFailurePolicy::Abort);
    assert_eq!(config.alignment.markers, HighlightMarkers::ansi());

    assert!(config.cache.enabled);
    assert_eq!(config.cache.capacity, 1000);
    assert_eq!(config.transcripts.max_concurrent_fetches, 4);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Invalid source language
    config.source_language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.source_language = "en".to_string();

    // Invalid target language
    config.target_language = "".to_string();
    assert!(config.validate().is_err());

    // Same language on both sides, even in different notations
    config.target_language = "eng".to_string();
    assert!(config.validate().is_err());
    config.target_language = "fr".to_string();

    // Threshold must be positive
    config.alignment.time_threshold = 0.0;
    assert!(config.validate().is_err());
    config.alignment.time_threshold = f64::NAN;
    assert!(config.validate().is_err());
    config.alignment.time_threshold = 0.5;

    // Enabled cache needs room for one entry
    config.cache.capacity = 0;
    assert!(config.validate().is_err());
    config.cache.enabled = false;
    assert!(config.validate().is_ok());
    config.cache.enabled = true;
    config.cache.capacity = 10;

    // Ollama needs a usable endpoint
    config.translation.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.translation.provider = TranslationProvider::Mock;
    assert!(config.validate().is_ok());
}

/// Test that a minimal file fills every section with defaults
#[test]
fn test_deserialize_withMinimalJson_shouldApplyDefaults() {
    let json = r#"{ "source_language": "en", "target_language": "es" }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.target_language, "es");
    assert_eq!(config.alignment.min_keyword_length, 3);
    assert_eq!(config.cache.capacity, 1000);
    assert_eq!(config.transcripts.directory, "captions");
    assert!(config.validate().is_ok());
}

/// Test that enum settings use their snake_case names
#[test]
fn test_deserialize_withAlignmentSection_shouldParseEnums() {
    let json = r#"{
        "source_language": "en",
        "target_language": "ja",
        "alignment": {
            "time_threshold": 0.8,
            "strategy": "closest_match",
            "proper_noun_filter": "never",
            "translation_failure_policy": "skip_segment",
            "markers": { "open": "<b>", "close": "</b>" }
        },
        "translation": { "provider": "mock" },
        "log_level": "debug"
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.alignment.time_threshold, 0.8);
    assert_eq!(config.alignment.strategy, AlignmentStrategy::ClosestMatch);
    assert_eq!(config.alignment.proper_noun_filter, ProperNounFilter::Never);
    assert_eq!(config.alignment.translation_failure_policy, TranslationFailurePolicy::SkipSegment);
    assert_eq!(config.alignment.markers.open, "<b>");
    assert_eq!(config.alignment.max_time, 60.0);
    assert_eq!(config.translation.provider, TranslationProvider::Mock);
    assert_eq!(config.log_level, LogLevel::Debug);
}

/// Test saving and reloading a configuration file
#[test]
fn test_config_roundTrip_throughFile_shouldPreserveValues() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.target_language = "de".to_string();
    config.alignment.markers = HighlightMarkers::html();
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let loaded: Config = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded.target_language, "de");
    assert_eq!(loaded.alignment, config.alignment);
}

/// Test provider parsing and names
#[test]
fn test_translation_provider_fromStr_shouldParseKnownProviders() {
    assert_eq!("ollama".parse::<TranslationProvider>().unwrap(), TranslationProvider::Ollama);
    assert_eq!("MOCK".parse::<TranslationProvider>().unwrap(), TranslationProvider::Mock);
    assert!("openai".parse::<TranslationProvider>().is_err());
    assert_eq!(TranslationProvider::Ollama.display_name(), "Ollama");
    assert_eq!(TranslationProvider::Mock.to_string(), "mock");

    assert_eq!("skip".parse::<TranslationFailurePolicy>().unwrap(), TranslationFailurePolicy::SkipSegment);
    assert_eq!("abort".parse::<TranslationFailurePolicy>().unwrap(), TranslationFailurePolicy::Abort);
}

/// Test the failure policy each provider implies
#[test]
fn test_translation_provider_defaultFailurePolicy_shouldSkipOnlyForMock() {
    assert_eq!(TranslationProvider::Ollama.default_failure_policy(), TranslationFailurePolicy::Abort);
    assert_eq!(TranslationProvider::Mock.default_failure_policy(), TranslationFailurePolicy::SkipSegment);
}

/// Test log level mapping
#[test]
fn test_log_level_toLevelFilter_shouldMapEveryLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
