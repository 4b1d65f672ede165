/*!
 * The alignment pipeline.
 *
 * Every source segment moves through the same stages:
 * aligned → cleaned → keyword extracted → verified in source →
 * translated → verified in target → recorded.
 * A segment that falls out at any stage is skipped with a `SkipReason`;
 * only a fetch failure or (under `TranslationFailurePolicy::Abort`) a
 * translator failure ends the run.
 */

use log::{debug, info, warn};
use std::sync::Arc;

use super::aligner::SegmentAligner;
use super::cleaner::TextCleaner;
use super::highlight::HighlightMatcher;
use super::result::{AlignmentReport, AlignmentResult, KeywordMatch, PipelineStats, SegmentOutcome, SkipReason};
use crate::app_config::{AlignmentConfig, TranslationFailurePolicy};
use crate::captions::{CaptionSegment, SegmentFilter, TranscriptSource};
use crate::errors::{PipelineError, TranslationError};
use crate::keywords::KeywordExtractor;
use crate::translation::Translator;

/// Builds keyword pairs from two caption tracks of the same video
pub struct AlignmentPipeline {
    source: Arc<dyn TranscriptSource>,
    extractor: Arc<dyn KeywordExtractor>,
    translator: Arc<dyn Translator>,
    filter: SegmentFilter,
    aligner: SegmentAligner,
    cleaner: TextCleaner,
    matcher: HighlightMatcher,
    min_keyword_length: usize,
    failure_policy: TranslationFailurePolicy,
}

impl AlignmentPipeline {
    pub fn new(
        source: Arc<dyn TranscriptSource>,
        extractor: Arc<dyn KeywordExtractor>,
        translator: Arc<dyn Translator>,
        config: &AlignmentConfig,
    ) -> Self {
        Self {
            source,
            extractor,
            translator,
            filter: SegmentFilter::new(config.max_time, config.min_duration),
            aligner: SegmentAligner::new(config.time_threshold, config.strategy),
            cleaner: TextCleaner::new(config.proper_noun_filter),
            matcher: HighlightMatcher::new(config.markers.clone()),
            min_keyword_length: config.min_keyword_length,
            failure_policy: config.translation_failure_policy,
        }
    }

    /// Fetch both tracks of `video_id` and align them
    pub async fn run(
        &self,
        video_id: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<AlignmentReport, PipelineError> {
        self.run_with_progress(video_id, source_language, target_language, |_, _| {})
            .await
    }

    /// Like `run`, calling `progress(done, total)` after each source segment
    pub async fn run_with_progress<F>(
        &self,
        video_id: &str,
        source_language: &str,
        target_language: &str,
        progress: F,
    ) -> Result<AlignmentReport, PipelineError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        info!(
            "Fetching {} and {} transcripts for video {}",
            source_language, target_language, video_id
        );

        let (source_track, target_track) = tokio::join!(
            self.source.fetch(video_id, source_language),
            self.source.fetch(video_id, target_language)
        );
        let source_track = source_track?;
        let target_track = target_track?;

        debug!(
            "Fetched {} source and {} target segments",
            source_track.len(),
            target_track.len()
        );

        self.align_tracks_with_progress(&source_track, &target_track, source_language, target_language, progress)
            .await
    }

    /// Align two already fetched tracks
    pub async fn align_tracks(
        &self,
        source_track: &[CaptionSegment],
        target_track: &[CaptionSegment],
        source_language: &str,
        target_language: &str,
    ) -> Result<AlignmentReport, PipelineError> {
        self.align_tracks_with_progress(source_track, target_track, source_language, target_language, |_, _| {})
            .await
    }

    pub async fn align_tracks_with_progress<F>(
        &self,
        source_track: &[CaptionSegment],
        target_track: &[CaptionSegment],
        source_language: &str,
        target_language: &str,
        progress: F,
    ) -> Result<AlignmentReport, PipelineError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let sources = self.filter.apply(source_track);
        let targets = self.filter.apply(target_track);

        let mut result = AlignmentResult::default();
        let mut stats = PipelineStats {
            source_segments: sources.len(),
            target_segments: targets.len(),
            ..PipelineStats::default()
        };

        let total = sources.len();
        for (index, segment) in sources.iter().enumerate() {
            let outcome = self
                .process_segment(segment, &targets, source_language, target_language)
                .await?;
            stats.count(&outcome);

            match outcome {
                SegmentOutcome::Recorded(keyword_match) => {
                    debug!(
                        "Recorded '{}' -> '{}'",
                        keyword_match.source_keyword, keyword_match.translated_keyword
                    );
                    result.record(keyword_match);
                }
                SegmentOutcome::Skipped(reason) => {
                    debug!("Skipped segment {}: {}", segment, reason);
                }
            }

            progress(index + 1, total);
        }

        info!("Alignment finished: {}", stats);
        Ok(AlignmentReport { result, stats })
    }

    /// Run one source segment through every stage
    pub async fn process_segment(
        &self,
        segment: &CaptionSegment,
        targets: &[CaptionSegment],
        source_language: &str,
        target_language: &str,
    ) -> Result<SegmentOutcome, TranslationError> {
        let Some(target) = self.aligner.find_match(segment, targets) else {
            return Ok(SegmentOutcome::Skipped(SkipReason::Unaligned));
        };

        let cleaned = self.cleaner.clean(&segment.text, source_language);
        if cleaned.is_empty() {
            return Ok(SegmentOutcome::Skipped(SkipReason::EmptyAfterCleaning));
        }

        let candidates = self.extractor.extract(&cleaned, source_language, 1, 1).await;
        let Some(best) = candidates.into_iter().next() else {
            return Ok(SegmentOutcome::Skipped(SkipReason::NoKeyword));
        };

        let keyword = best.keyword.trim();
        if keyword.chars().count() < self.min_keyword_length {
            return Ok(SegmentOutcome::Skipped(SkipReason::KeywordTooShort));
        }

        // Verified against the original line, not the cleaned one
        let (highlighted_source_text, found) = self.matcher.highlight(&segment.text, keyword);
        if !found {
            return Ok(SegmentOutcome::Skipped(SkipReason::SourceNotVerified));
        }

        let translated = match self
            .translator
            .translate(keyword, source_language, target_language)
            .await
        {
            Ok(translated) => translated.trim().to_lowercase(),
            Err(e) => match self.failure_policy {
                TranslationFailurePolicy::Abort => return Err(e),
                TranslationFailurePolicy::SkipSegment => {
                    warn!("Translation of '{}' failed, skipping segment: {}", keyword, e);
                    return Ok(SegmentOutcome::Skipped(SkipReason::TranslationFailed));
                }
            },
        };

        let (highlighted_target_text, found) = self.matcher.highlight(&target.text, &translated);
        if !found {
            return Ok(SegmentOutcome::Skipped(SkipReason::TargetNotVerified));
        }

        Ok(SegmentOutcome::Recorded(KeywordMatch {
            source_keyword: keyword.to_string(),
            translated_keyword: translated,
            highlighted_source_text,
            highlighted_target_text,
        }))
    }
}

impl std::fmt::Debug for AlignmentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignmentPipeline")
            .field("source", &self.source)
            .field("filter", &self.filter)
            .field("aligner", &self.aligner)
            .field("min_keyword_length", &self.min_keyword_length)
            .field("failure_policy", &self.failure_policy)
            .finish_non_exhaustive()
    }
}
