/*!
 * End-to-end alignment runs over in-memory caption tracks
 */

use std::sync::Arc;

use lingopair::alignment::{AlignmentPipeline, AlignmentStrategy, HighlightMarkers, SkipReason};
use lingopair::app_config::{AlignmentConfig, TranslationFailurePolicy, TranslationProvider};
use lingopair::errors::{PipelineError, TranscriptError};
use lingopair::keywords::FrequencyExtractor;
use lingopair::providers::MockTranslator;
use lingopair::translation::{CachedTranslator, TranslationCache};

use crate::common::{init_test_logging, sample_english_track, sample_french_track, segment, MemorySource, ScriptedExtractor};

fn html_config() -> AlignmentConfig {
    AlignmentConfig {
        markers: HighlightMarkers::html(),
        ..AlignmentConfig::default()
    }
}

fn sample_source() -> Arc<MemorySource> {
    Arc::new(
        MemorySource::default()
            .with_track("en", sample_english_track())
            .with_track("fr", sample_french_track()),
    )
}

#[tokio::test]
async fn test_run_withSampleVideo_shouldRecordOnlyVerifiedPairs() {
    init_test_logging();
    let pipeline = AlignmentPipeline::new(
        sample_source(),
        Arc::new(FrequencyExtractor::default()),
        Arc::new(MockTranslator::builtin()),
        &html_config(),
    );

    let report = pipeline.run("sample", "en", "fr").await.unwrap();
    let result = &report.result;

    assert_eq!(result.mapping.len(), 2);
    assert_eq!(result.mapping["cat"], "chat");
    assert_eq!(result.mapping["night"], "nuit");
    assert_eq!(
        result.phrase_pairs,
        vec![
            (
                "the <mark>cat</mark> sat on the mat".to_string(),
                "le <mark>chat</mark> était assis sur le tapis".to_string()
            ),
            (
                "a dog at <mark>night</mark>".to_string(),
                "un chien aboie la <mark>nuit</mark>".to_string()
            ),
        ]
    );

    let stats = &report.stats;
    assert_eq!(stats.source_segments, 5);
    assert_eq!(stats.target_segments, 5);
    assert_eq!(stats.recorded, 2);
    assert_eq!(stats.skipped_for(SkipReason::EmptyAfterCleaning), 1);
    assert_eq!(stats.skipped_for(SkipReason::TargetNotVerified), 1);
    assert_eq!(stats.skipped_for(SkipReason::Unaligned), 1);
}

#[tokio::test]
async fn test_run_twiceWithCachedTranslator_shouldBeIdempotent() {
    let inner = MockTranslator::builtin();
    let cache = TranslationCache::new(100);
    let pipeline = AlignmentPipeline::new(
        sample_source(),
        Arc::new(FrequencyExtractor::default()),
        Arc::new(CachedTranslator::new(inner.clone(), cache.clone())),
        &html_config(),
    );

    let first = pipeline.run("sample", "en", "fr").await.unwrap();
    let calls_after_first = inner.request_count();
    let second = pipeline.run("sample", "en", "fr").await.unwrap();

    assert_eq!(first.result, second.result);
    assert_eq!(inner.request_count(), calls_after_first);
    assert!(cache.stats().hits >= 3);
}

#[tokio::test]
async fn test_run_withUnknownKeywordAndAbortPolicy_shouldFailWholeRun() {
    let source = Arc::new(
        MemorySource::default()
            .with_track("en", vec![segment("the cat sat", 1.0, 3.0, "en"), segment("lovely weather", 5.0, 3.0, "en")])
            .with_track("fr", vec![segment("le chat assis", 1.0, 3.0, "fr"), segment("beau temps", 5.0, 3.0, "fr")]),
    );
    let pipeline = AlignmentPipeline::new(
        source,
        Arc::new(FrequencyExtractor::default()),
        Arc::new(MockTranslator::builtin()),
        &html_config(),
    );

    let err = pipeline.run("video", "en", "fr").await.unwrap_err();
    assert!(matches!(err, PipelineError::Translation(_)));
}

#[tokio::test]
async fn test_run_withSkipPolicy_shouldKeepEarlierAndLaterPairs() {
    init_test_logging();
    let source = Arc::new(
        MemorySource::default()
            .with_track(
                "en",
                vec![
                    segment("the cat sat", 1.0, 3.0, "en"),
                    segment("lovely weather", 5.0, 3.0, "en"),
                    segment("my house", 9.0, 3.0, "en"),
                ],
            )
            .with_track(
                "fr",
                vec![
                    segment("le chat assis", 1.0, 3.0, "fr"),
                    segment("beau temps", 5.0, 3.0, "fr"),
                    segment("ma maison", 9.0, 3.0, "fr"),
                ],
            ),
    );
    let config = AlignmentConfig {
        translation_failure_policy: TranslationFailurePolicy::SkipSegment,
        ..html_config()
    };
    let pipeline = AlignmentPipeline::new(
        source,
        Arc::new(FrequencyExtractor::default()),
        Arc::new(MockTranslator::builtin()),
        &config,
    );

    let report = pipeline.run("video", "en", "fr").await.unwrap();
    assert_eq!(report.result.mapping.len(), 2);
    assert_eq!(report.result.mapping["house"], "maison");
    assert_eq!(report.stats.skipped_for(SkipReason::TranslationFailed), 1);
}

#[tokio::test]
async fn test_run_withMissingTargetTrack_shouldReturnFetchError() {
    let source = Arc::new(MemorySource::default().with_track("en", sample_english_track()));
    let pipeline = AlignmentPipeline::new(
        source,
        Arc::new(FrequencyExtractor::default()),
        Arc::new(MockTranslator::builtin()),
        &html_config(),
    );

    let err = pipeline.run("sample", "en", "fr").await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Fetch(TranscriptError::NotFound { ref language, .. }) if language == "fr"
    ));
}

#[tokio::test]
async fn test_run_withDisabledCaptions_shouldReturnDisabledError() {
    let pipeline = AlignmentPipeline::new(
        Arc::new(MemorySource::disabled()),
        Arc::new(FrequencyExtractor::default()),
        Arc::new(MockTranslator::builtin()),
        &html_config(),
    );

    let err = pipeline.run("sample", "en", "fr").await.unwrap_err();
    assert!(matches!(err, PipelineError::Fetch(TranscriptError::Disabled { .. })));
}

#[tokio::test]
async fn test_closest_strategy_withTwoCandidates_shouldPickTighterTarget() {
    let sources = vec![segment("my cat", 10.0, 2.0, "en")];
    let targets = vec![
        segment("un chat perdu", 10.4, 2.0, "fr"),
        segment("mon chat", 10.0, 2.0, "fr"),
    ];
    let extractor = Arc::new(ScriptedExtractor::default().answer("my cat", "cat"));

    let first = AlignmentPipeline::new(
        Arc::new(MemorySource::default()),
        extractor.clone(),
        Arc::new(MockTranslator::builtin()),
        &html_config(),
    );
    let report = first.align_tracks(&sources, &targets, "en", "fr").await.unwrap();
    assert_eq!(report.result.phrase_pairs[0].1, "un <mark>chat</mark> perdu");

    let closest = AlignmentPipeline::new(
        Arc::new(MemorySource::default()),
        extractor,
        Arc::new(MockTranslator::builtin()),
        &AlignmentConfig {
            strategy: AlignmentStrategy::ClosestMatch,
            ..html_config()
        },
    );
    let report = closest.align_tracks(&sources, &targets, "en", "fr").await.unwrap();
    assert_eq!(report.result.phrase_pairs[0].1, "mon <mark>chat</mark>");
}

#[tokio::test]
async fn test_repeated_keyword_shouldKeepEveryPhrasePair() {
    let sources = vec![segment("a cat", 1.0, 3.0, "en"), segment("your cat", 5.0, 3.0, "en")];
    let targets = vec![segment("un chat", 1.0, 3.0, "fr"), segment("ton chat", 5.0, 3.0, "fr")];
    let pipeline = AlignmentPipeline::new(
        Arc::new(MemorySource::default()),
        Arc::new(FrequencyExtractor::default()),
        Arc::new(MockTranslator::builtin()),
        &html_config(),
    );

    let report = pipeline.align_tracks(&sources, &targets, "en", "fr").await.unwrap();
    assert_eq!(report.result.mapping.len(), 1);
    assert_eq!(report.result.phrase_pairs.len(), 2);
}

#[tokio::test]
async fn test_caseless_source_language_shouldKeepLatinTokens() {
    // Japanese line with a Latin brand name; translator maps it to itself
    let sources = vec![segment("(笑) Tokyo へ", 1.0, 3.0, "ja")];
    let targets = vec![segment("to Tokyo", 1.0, 3.0, "en")];
    let extractor = Arc::new(ScriptedExtractor::default().answer("Tokyo へ", "Tokyo"));
    let pipeline = AlignmentPipeline::new(
        Arc::new(MemorySource::default()),
        extractor,
        Arc::new(MockTranslator::echo()),
        &html_config(),
    );

    let report = pipeline.align_tracks(&sources, &targets, "ja", "en").await.unwrap();
    assert_eq!(report.result.mapping.get("Tokyo").map(String::as_str), Some("tokyo"));
    assert_eq!(report.result.phrase_pairs[0].0, "(笑) <mark>Tokyo</mark> へ");
    assert_eq!(report.result.phrase_pairs[0].1, "to <mark>Tokyo</mark>");
}

#[tokio::test]
async fn test_recorded_source_line_shouldKeepTextRemovedByCleaning() {
    let sources = vec![segment("(Laughs) the cat sat on the mat", 1.0, 3.0, "en")];
    let targets = vec![segment("le chat s'est assis sur le tapis", 1.1, 2.9, "fr")];
    let pipeline = AlignmentPipeline::new(
        Arc::new(MemorySource::default()),
        Arc::new(FrequencyExtractor::default()),
        Arc::new(MockTranslator::builtin()),
        &AlignmentConfig {
            min_duration: 1.5,
            ..html_config()
        },
    );

    let report = pipeline.align_tracks(&sources, &targets, "en", "fr").await.unwrap();

    assert_eq!(report.result.mapping.len(), 1);
    assert_eq!(report.result.mapping["cat"], "chat");
    assert_eq!(
        report.result.phrase_pairs,
        vec![(
            "(Laughs) the <mark>cat</mark> sat on the mat".to_string(),
            "le <mark>chat</mark> s'est assis sur le tapis".to_string()
        )]
    );
}

#[tokio::test]
async fn test_mock_provider_policy_withUnknownWord_shouldSkipInsteadOfAborting() {
    let sources = vec![segment("a zebra ran", 1.0, 3.0, "en"), segment("the cat sat", 5.0, 3.0, "en")];
    let targets = vec![segment("un zèbre courait", 1.0, 3.0, "fr"), segment("le chat assis", 5.0, 3.0, "fr")];
    let pipeline = AlignmentPipeline::new(
        Arc::new(MemorySource::default()),
        Arc::new(FrequencyExtractor::default()),
        Arc::new(MockTranslator::builtin()),
        &AlignmentConfig {
            translation_failure_policy: TranslationProvider::Mock.default_failure_policy(),
            ..html_config()
        },
    );

    let report = pipeline.align_tracks(&sources, &targets, "en", "fr").await.unwrap();

    assert_eq!(report.stats.skipped_for(SkipReason::TranslationFailed), 1);
    assert_eq!(report.result.mapping.len(), 1);
    assert_eq!(report.result.mapping["cat"], "chat");
}
