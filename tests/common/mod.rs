/*!
 * Common test utilities for the lingopair test suite
 */

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use lingopair::captions::{CaptionSegment, TranscriptInfo, TranscriptSource};
use lingopair::errors::TranscriptError;
use lingopair::keywords::{KeywordExtractor, ScoredKeyword};

/// Routes library log output through the test harness; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Writes a caption track as `<video_id>.<suffix>.json`
pub fn write_track(dir: &Path, video_id: &str, suffix: &str, segments: &[(&str, f64, f64)]) -> Result<PathBuf> {
    let body: Vec<serde_json::Value> = segments
        .iter()
        .map(|(text, start, duration)| serde_json::json!({ "text": text, "start": start, "duration": duration }))
        .collect();
    create_test_file(dir, &format!("{}.{}.json", video_id, suffix), &serde_json::to_string(&body)?)
}

/// Builds a segment in the given language
pub fn segment(text: &str, start: f64, duration: f64, language: &str) -> CaptionSegment {
    CaptionSegment::new(text, start, duration, language)
}

/// The English half of the sample video.
///
/// With the built-in dictionary only "cat" and "night" survive verification.
pub fn sample_english_track() -> Vec<CaptionSegment> {
    vec![
        segment("(Music) Welcome", 0.0, 3.0, "en"),
        segment("the cat sat on the mat", 3.0, 3.0, "en"),
        segment("Paris is a big city", 6.0, 3.0, "en"),
        segment("a dog at night", 9.0, 3.0, "en"),
        segment("we drink coffee", 12.0, 3.0, "en"),
        segment("ok", 15.0, 1.0, "en"),
    ]
}

/// The French half of the sample video
pub fn sample_french_track() -> Vec<CaptionSegment> {
    vec![
        segment("(Musique) Bienvenue", 0.1, 2.9, "fr"),
        segment("le chat était assis sur le tapis", 3.1, 2.8, "fr"),
        segment("Paris est une grande métropole", 6.0, 3.0, "fr"),
        segment("un chien aboie la nuit", 9.2, 2.9, "fr"),
        segment("nous buvons du café", 20.0, 3.0, "fr"),
    ]
}

/// Transcript source serving tracks from memory
#[derive(Debug, Default)]
pub struct MemorySource {
    tracks: HashMap<String, Vec<CaptionSegment>>,
    disabled: bool,
}

impl MemorySource {
    pub fn with_track(mut self, language: &str, segments: Vec<CaptionSegment>) -> Self {
        self.tracks.insert(language.to_string(), segments);
        self
    }

    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl TranscriptSource for MemorySource {
    async fn fetch(&self, video_id: &str, language: &str) -> Result<Vec<CaptionSegment>, TranscriptError> {
        if self.disabled {
            return Err(TranscriptError::Disabled { video_id: video_id.to_string() });
        }
        self.tracks.get(language).cloned().ok_or_else(|| TranscriptError::NotFound {
            video_id: video_id.to_string(),
            language: language.to_string(),
        })
    }

    async fn list_available(&self, video_id: &str) -> Result<Vec<TranscriptInfo>, TranscriptError> {
        if self.disabled {
            return Err(TranscriptError::Disabled { video_id: video_id.to_string() });
        }
        let mut languages: Vec<_> = self.tracks.keys().cloned().collect();
        languages.sort();
        Ok(languages
            .into_iter()
            .map(|language| TranscriptInfo {
                display_name: language.clone(),
                language_code: language,
                is_generated: false,
                is_translatable: false,
                translation_languages: Vec::new(),
            })
            .collect())
    }
}

/// Extractor returning a fixed answer per exact input line
#[derive(Debug, Default)]
pub struct ScriptedExtractor {
    answers: HashMap<String, String>,
}

impl ScriptedExtractor {
    pub fn answer(mut self, cleaned_text: &str, keyword: &str) -> Self {
        self.answers.insert(cleaned_text.to_string(), keyword.to_string());
        self
    }
}

#[async_trait]
impl KeywordExtractor for ScriptedExtractor {
    async fn extract(&self, text: &str, _language: &str, _top_n: usize, _ngram: usize) -> Vec<ScoredKeyword> {
        self.answers
            .get(text)
            .map(|keyword| vec![ScoredKeyword::new(keyword.clone(), 1.0)])
            .unwrap_or_default()
    }
}
