/*!
 * Caption tracks and their retrieval.
 *
 * - `filter`: time/duration window over a track
 * - `source`: the `TranscriptSource` capability and a file-backed implementation
 * - `batch`: bounded concurrent fetch of several languages at once
 */

use serde::{Deserialize, Serialize};
use std::fmt;

pub use self::batch::{fetch_many, BatchFetch};
pub use self::filter::SegmentFilter;
pub use self::source::{JsonDirectorySource, TranscriptSource};

pub mod batch;
pub mod filter;
pub mod source;

/// One timed line of a caption track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    /// Caption text as published
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Display duration in seconds
    pub duration: f64,

    /// Language code of the track this line belongs to
    #[serde(default)]
    pub language: String,
}

impl CaptionSegment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
            language: language.into(),
        }
    }

    /// End time in seconds
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

impl fmt::Display for CaptionSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2}s-{:.2}s] {}", self.start, self.end(), self.text)
    }
}

/// A language a track can be machine-translated into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationLanguage {
    pub language_code: String,
    pub display_name: String,
}

/// Metadata about one caption track available for a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptInfo {
    /// Language code of the track
    pub language_code: String,

    /// Human readable language name
    pub display_name: String,

    /// Whether the track was generated by speech recognition
    pub is_generated: bool,

    /// Whether the provider can translate the track
    pub is_translatable: bool,

    /// Target languages the provider can translate the track into
    #[serde(default)]
    pub translation_languages: Vec<TranslationLanguage>,
}
