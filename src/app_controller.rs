use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::fmt::Write as _;
use std::sync::Arc;

use crate::alignment::{AlignmentPipeline, AlignmentReport, AlignmentResult};
use crate::app_config::{Config, TranslationProvider};
use crate::captions::{fetch_many, BatchFetch, JsonDirectorySource, TranscriptInfo, TranscriptSource};
use crate::keywords::{FrequencyExtractor, KeywordExtractor};
use crate::providers::{MockTranslator, OllamaTranslator};
use crate::translation::{CachedTranslator, TranslationCache, Translator};

// @module: Application controller for keyword alignment runs

/// Wires configuration, transcript source, extractor and translator together
pub struct Controller {
    // @field: App configuration
    config: Config,
    source: Arc<dyn TranscriptSource>,
    extractor: Arc<dyn KeywordExtractor>,
    // @field: Translator with the shared cache in front of it
    translator: Arc<dyn Translator>,
    cache: TranslationCache,
}

impl Controller {
    /// Create a controller with default configuration and the offline translator
    pub fn new_for_test() -> Result<Self> {
        let mut config = Config::default();
        config.translation.provider = TranslationProvider::Mock;
        Self::with_config(config)
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let source: Arc<dyn TranscriptSource> = Arc::new(JsonDirectorySource::new(&config.transcripts.directory));
        let translator: Arc<dyn Translator> = match config.translation.provider {
            TranslationProvider::Ollama => Arc::new(OllamaTranslator::from_config(&config.translation)),
            TranslationProvider::Mock => Arc::new(MockTranslator::builtin()),
        };

        Self::with_components(config, source, Arc::new(FrequencyExtractor::default()), translator)
    }

    /// Create a controller around caller-provided capabilities.
    ///
    /// The translator is wrapped in a cache built from `config.cache`.
    pub fn with_components(
        config: Config,
        source: Arc<dyn TranscriptSource>,
        extractor: Arc<dyn KeywordExtractor>,
        translator: Arc<dyn Translator>,
    ) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let cache = if config.cache.enabled {
            TranslationCache::new(config.cache.capacity)
        } else {
            TranslationCache::disabled()
        };
        let translator: Arc<dyn Translator> = Arc::new(CachedTranslator::new(translator, cache.clone()));

        Ok(Self {
            config,
            source,
            extractor,
            translator,
            cache,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.source_language.is_empty() && !self.config.target_language.is_empty()
    }

    /// Build a pipeline sharing this controller's source, extractor and cached translator
    pub fn pipeline(&self) -> AlignmentPipeline {
        AlignmentPipeline::new(
            self.source.clone(),
            self.extractor.clone(),
            self.translator.clone(),
            &self.config.alignment,
        )
    }

    /// Align one video without progress reporting
    pub async fn align(&self, video_id: &str) -> Result<AlignmentReport> {
        let report = self
            .pipeline()
            .run(video_id, &self.config.source_language, &self.config.target_language)
            .await?;
        Ok(report)
    }

    /// Align one video while drawing a progress bar over the source segments
    pub async fn run_align(&self, video_id: &str) -> Result<AlignmentReport> {
        let start_time = std::time::Instant::now();

        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%)"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message(format!(
            "{} → {}",
            self.config.source_language, self.config.target_language
        ));

        let result = self
            .pipeline()
            .run_with_progress(
                video_id,
                &self.config.source_language,
                &self.config.target_language,
                |done, total| {
                    progress_bar.set_length(total as u64);
                    progress_bar.set_position(done as u64);
                },
            )
            .await;
        progress_bar.finish_and_clear();

        let report = result?;
        let cache_stats = self.cache.stats();
        info!(
            "Aligned {} in {} ({} pairs, cache hit rate {:.0}%)",
            video_id,
            Self::format_duration(start_time.elapsed()),
            report.result.mapping.len(),
            cache_stats.hit_rate() * 100.0
        );

        if report.result.is_empty() {
            warn!("No keyword pair could be verified for video {}", video_id);
        }

        Ok(report)
    }

    /// List the caption tracks available for a video
    pub async fn list(&self, video_id: &str) -> Result<Vec<TranscriptInfo>> {
        let tracks = self.source.list_available(video_id).await?;
        Ok(tracks)
    }

    /// Fetch several languages of a video concurrently
    pub async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<BatchFetch> {
        if languages.is_empty() {
            return Err(anyhow!("At least one language is required"));
        }

        let batch = fetch_many(
            self.source.clone(),
            video_id,
            languages,
            self.config.transcripts.max_concurrent_fetches,
        )
        .await;

        info!(
            "Fetched {} of {} languages for video {}",
            batch.transcripts.len(),
            languages.len(),
            video_id
        );
        Ok(batch)
    }

    /// Human readable rendering of a run: the mapping, then every phrase pair
    pub fn render_text(result: &AlignmentResult) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "Keywords ({}):", result.mapping.len());
        for (source, translated) in &result.mapping {
            let _ = writeln!(output, "  {} → {}", source, translated);
        }

        let _ = writeln!(output, "\nPhrases ({}):", result.phrase_pairs.len());
        for (source_line, target_line) in &result.phrase_pairs {
            let _ = writeln!(output, "  {}", source_line);
            let _ = writeln!(output, "  {}\n", target_line);
        }

        output
    }

    /// JSON rendering of a run
    pub fn render_json(result: &AlignmentResult) -> Result<String> {
        serde_json::to_string_pretty(result).context("Failed to serialize alignment result")
    }

    /// JSON body reported in place of a result when a run fails
    pub fn render_json_error(error: &anyhow::Error) -> String {
        serde_json::json!({ "error": format!("{:#}", error) }).to_string()
    }

    /// Human readable listing of tracks
    pub fn render_listing(video_id: &str, tracks: &[TranscriptInfo]) -> String {
        let mut output = format!("Transcripts for {}:\n", video_id);
        for track in tracks {
            let kind = if track.is_generated { "generated" } else { "manual" };
            let _ = writeln!(output, "  {:<8} {:<24} {}", track.language_code, track.display_name, kind);
        }
        output
    }

    fn format_duration(duration: std::time::Duration) -> String {
        let total_secs = duration.as_secs();
        if total_secs >= 60 {
            format!("{}m {}s", total_secs / 60, total_secs % 60)
        } else {
            format!("{}.{:03}s", total_secs, duration.subsec_millis())
        }
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("config", &self.config)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
