/*!
 * # lingopair - bilingual keyword pairs from aligned captions
 *
 * A Rust library that builds a small verified vocabulary from two caption
 * tracks of the same video.
 *
 * ## Features
 *
 * - Align caption segments of two languages by their timestamps
 * - Strip asides and proper nouns, then pick one salient keyword per line
 * - Translate keywords through a pluggable translator:
 *   - Ollama (local LLM)
 *   - Built-in offline dictionary
 * - Keep a pair only when the translation literally appears in the
 *   aligned line, and highlight both occurrences
 * - Bounded LRU cache in front of the translator
 * - Concurrent retrieval of several caption tracks
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `captions`: Caption segments, the transcript source and batch fetching
 * - `keywords`: Keyword extraction
 * - `translation`: The translator capability and its cache
 * - `alignment`: Aligner, cleaner, highlighter and the pipeline
 * - `providers`: Ollama client and the mock translator
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod alignment;
pub mod app_config;
pub mod app_controller;
pub mod captions;
pub mod errors;
pub mod keywords;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use alignment::{AlignmentPipeline, AlignmentReport, AlignmentResult, KeywordMatch, SkipReason};
pub use app_config::Config;
pub use captions::{CaptionSegment, TranscriptInfo, TranscriptSource};
pub use errors::{AppError, PipelineError, ProviderError, TranscriptError, TranslationError};
pub use keywords::KeywordExtractor;
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use translation::Translator;
