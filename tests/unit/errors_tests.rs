/*!
 * Tests for error types
 */

use lingopair::errors::{AppError, PipelineError, ProviderError, TranscriptError, TranslationError};

#[test]
fn test_transcript_error_display_shouldNameVideoAndLanguage() {
    let error = TranscriptError::NotFound {
        video_id: "abc".to_string(),
        language: "fr".to_string(),
    };
    let message = error.to_string();
    assert!(message.contains("abc"));
    assert!(message.contains("fr"));

    let disabled = TranscriptError::Disabled { video_id: "abc".to_string() };
    assert!(disabled.to_string().contains("disabled"));
}

#[test]
fn test_provider_error_intoTranslationError_shouldWrap() {
    let error: TranslationError = ProviderError::ApiError {
        status_code: 503,
        message: "busy".to_string(),
    }
    .into();

    assert!(matches!(error, TranslationError::Provider(ProviderError::ApiError { status_code: 503, .. })));
    assert!(error.to_string().contains("503"));
}

#[test]
fn test_pipeline_error_fromSources_shouldKeepVariant() {
    let fetch: PipelineError = TranscriptError::Parse("bad json".to_string()).into();
    assert!(matches!(fetch, PipelineError::Fetch(TranscriptError::Parse(_))));

    let translation: PipelineError = TranslationError::EmptyTranslation("cat".to_string()).into();
    assert!(matches!(translation, PipelineError::Translation(_)));
    assert!(translation.to_string().contains("cat"));
}

#[test]
fn test_app_error_conversions_shouldCoverEverySource() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    assert!(matches!(AppError::from(io), AppError::File(_)));

    let any = anyhow::anyhow!("boom");
    assert!(matches!(AppError::from(any), AppError::Unknown(_)));

    let pipeline = PipelineError::Fetch(TranscriptError::Disabled { video_id: "v".to_string() });
    assert!(matches!(AppError::from(pipeline), AppError::Pipeline(_)));

    let transcript_io: TranscriptError = std::io::Error::other("denied").into();
    assert!(matches!(transcript_io, TranscriptError::Io(_)));
}
