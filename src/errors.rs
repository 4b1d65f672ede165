/*!
 * Error types for the lingopair application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Per-segment misses (no aligned target, no keyword, failed verification) are
 * not errors; they are reported as `SkipReason`s by the alignment pipeline.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Errors raised while fetching or listing caption tracks
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// No track exists for the requested language
    #[error("No transcript found for video {video_id} in language: {language}")]
    NotFound {
        /// Video identifier
        video_id: String,
        /// Requested language code
        language: String,
    },

    /// Captions are disabled for the whole video
    #[error("Transcripts are disabled for video {video_id}")]
    Disabled {
        /// Video identifier
        video_id: String,
    },

    /// The track exists but could not be read
    #[error("Failed to read transcript: {0}")]
    Io(#[from] std::io::Error),

    /// The track could not be decoded
    #[error("Failed to parse transcript: {0}")]
    Parse(String),
}

/// Errors that can occur during keyword translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The translator produced nothing usable
    #[error("Empty translation for '{0}'")]
    EmptyTranslation(String),

    /// The translator refused or failed for another reason
    #[error("Translation failed: {0}")]
    Failed(String),
}

/// Run-fatal errors of the alignment pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// One of the two caption tracks could not be fetched
    #[error("Fetch error: {0}")]
    Fetch(#[from] TranscriptError),

    /// A keyword translation failed while the abort policy was active
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from transcript retrieval
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from the alignment pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
