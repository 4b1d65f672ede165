use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::alignment::{AlignmentStrategy, HighlightMarkers, ProperNounFilter};
use crate::translation::cache::DEFAULT_CACHE_CAPACITY;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Alignment and verification settings
    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Translation cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Keyword translator settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Where caption tracks are read from
    #[serde(default)]
    pub transcripts: TranscriptConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// What a run does when the translator fails for one keyword
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TranslationFailurePolicy {
    /// Fail the whole run, returning no partial result
    #[default]
    Abort,
    /// Drop only the affected segment and continue
    SkipSegment,
}

impl std::str::FromStr for TranslationFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "abort" => Ok(Self::Abort),
            "skip" | "skip_segment" => Ok(Self::SkipSegment),
            _ => Err(anyhow!("Invalid translation failure policy: {}", s)),
        }
    }
}

/// Alignment pipeline settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AlignmentConfig {
    /// Maximum start/end deviation in seconds for two segments to align
    #[serde(default = "default_time_threshold")]
    pub time_threshold: f64,

    /// Segments starting after this many seconds are ignored
    #[serde(default = "default_max_time")]
    pub max_time: f64,

    /// Segments shorter than this many seconds are ignored
    #[serde(default = "default_min_duration")]
    pub min_duration: f64,

    /// Shortest accepted keyword, in characters
    #[serde(default = "default_min_keyword_length")]
    pub min_keyword_length: usize,

    /// Target selection when several segments qualify
    #[serde(default)]
    pub strategy: AlignmentStrategy,

    /// Capitalized-token removal before keyword scoring
    #[serde(default)]
    pub proper_noun_filter: ProperNounFilter,

    /// Whether a translation failure aborts the run
    #[serde(default)]
    pub translation_failure_policy: TranslationFailurePolicy,

    /// Decoration around verified keywords
    #[serde(default)]
    pub markers: HighlightMarkers,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            time_threshold: default_time_threshold(),
            max_time: default_max_time(),
            min_duration: default_min_duration(),
            min_keyword_length: default_min_keyword_length(),
            strategy: AlignmentStrategy::default(),
            proper_noun_filter: ProperNounFilter::default(),
            translation_failure_policy: TranslationFailurePolicy::default(),
            markers: HighlightMarkers::default(),
        }
    }
}

/// Translation cache settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CacheConfig {
    /// Whether translations are memoized
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of cached translations
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: default_cache_capacity(),
        }
    }
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Ollama
    #[default]
    Ollama,
    // @provider: Built-in dictionary, offline
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
            Self::Mock => "Mock",
        }
    }

    /// Failure policy used when a run picks this provider without choosing one.
    ///
    /// The offline dictionary only knows a handful of words, so a miss skips
    /// the segment instead of aborting the run.
    pub fn default_failure_policy(&self) -> TranslationFailurePolicy {
        match self {
            Self::Ollama => TranslationFailurePolicy::Abort,
            Self::Mock => TranslationFailurePolicy::SkipSegment,
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Ollama => "ollama".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Keyword translator settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Model name
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Service endpoint URL
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff between retries in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            model: default_ollama_model(),
            endpoint: default_ollama_endpoint(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Caption track location and fetch concurrency
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranscriptConfig {
    /// Directory holding `<video_id>.<lang>.json` tracks
    #[serde(default = "default_transcript_directory")]
    pub directory: String,

    /// Maximum number of tracks fetched at the same time
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            directory: default_transcript_directory(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_time_threshold() -> f64 {
    0.5
}

fn default_max_time() -> f64 {
    60.0
}

fn default_min_duration() -> f64 {
    2.0
}

fn default_min_keyword_length() -> usize {
    3
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.0
}

fn default_true() -> bool {
    true
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_transcript_directory() -> String {
    "captions".to_string()
}

fn default_max_concurrent_fetches() -> usize {
    4
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::get_language_name(&self.source_language)?;
        crate::language_utils::get_language_name(&self.target_language)?;

        if crate::language_utils::language_codes_match(&self.source_language, &self.target_language) {
            return Err(anyhow!(
                "Source and target language must differ (both are '{}')",
                self.source_language
            ));
        }

        let alignment = &self.alignment;
        if !(alignment.time_threshold > 0.0) {
            return Err(anyhow!("Alignment time threshold must be positive, got {}", alignment.time_threshold));
        }
        if alignment.min_duration < 0.0 || alignment.max_time < 0.0 {
            return Err(anyhow!("Segment time window must not be negative"));
        }
        if alignment.markers.open.is_empty() || alignment.markers.close.is_empty() {
            return Err(anyhow!("Highlight markers must not be empty"));
        }

        if self.cache.enabled && self.cache.capacity == 0 {
            return Err(anyhow!("Translation cache capacity must be at least 1"));
        }

        if self.translation.provider == TranslationProvider::Ollama {
            url::Url::parse(&self.translation.endpoint)
                .map_err(|e| anyhow!("Invalid translation endpoint '{}': {}", self.translation.endpoint, e))?;
            if self.translation.model.trim().is_empty() {
                return Err(anyhow!("A model name is required for the Ollama provider"));
            }
        }

        if self.transcripts.max_concurrent_fetches == 0 {
            return Err(anyhow!("At least one concurrent transcript fetch is required"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_language: "fr".to_string(),
            alignment: AlignmentConfig::default(),
            cache: CacheConfig::default(),
            translation: TranslationConfig::default(),
            transcripts: TranscriptConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
