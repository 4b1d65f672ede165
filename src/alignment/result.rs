use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A verified keyword pair and the two highlighted lines it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub source_keyword: String,
    pub translated_keyword: String,
    pub highlighted_source_text: String,
    pub highlighted_target_text: String,
}

/// Everything a run produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Source keyword -> translated keyword; a repeated keyword keeps its last translation
    pub mapping: BTreeMap<String, String>,

    /// Highlighted (source line, target line) pairs in source track order
    pub phrase_pairs: Vec<(String, String)>,
}

impl AlignmentResult {
    pub fn record(&mut self, keyword_match: KeywordMatch) {
        self.mapping
            .insert(keyword_match.source_keyword, keyword_match.translated_keyword);
        self.phrase_pairs.push((
            keyword_match.highlighted_source_text,
            keyword_match.highlighted_target_text,
        ));
    }

    pub fn is_empty(&self) -> bool {
        self.phrase_pairs.is_empty()
    }
}

/// Result of a run together with its counters
#[derive(Debug, Clone, Default)]
pub struct AlignmentReport {
    pub result: AlignmentResult,
    pub stats: PipelineStats,
}

/// Why a source segment produced no keyword pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No target segment within the time threshold
    Unaligned,
    /// Nothing left after removing asides and proper nouns
    EmptyAfterCleaning,
    /// The extractor returned no candidate
    NoKeyword,
    /// The best candidate is shorter than the minimum length
    KeywordTooShort,
    /// The keyword is not a whole word of the original source line
    SourceNotVerified,
    /// The translation is not a whole word of the original target line
    TargetNotVerified,
    /// The translator failed and failures are configured to skip
    TranslationFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unaligned => "unaligned",
            Self::EmptyAfterCleaning => "empty after cleaning",
            Self::NoKeyword => "no keyword",
            Self::KeywordTooShort => "keyword too short",
            Self::SourceNotVerified => "keyword not in source",
            Self::TargetNotVerified => "translation not in target",
            Self::TranslationFailed => "translation failed",
        };
        f.write_str(label)
    }
}

/// What happened to one source segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOutcome {
    Recorded(KeywordMatch),
    Skipped(SkipReason),
}

/// Per-run counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Source segments left after filtering
    pub source_segments: usize,
    /// Target segments left after filtering
    pub target_segments: usize,
    pub recorded: usize,
    pub skipped: HashMap<SkipReason, usize>,
}

impl PipelineStats {
    pub fn count(&mut self, outcome: &SegmentOutcome) {
        match outcome {
            SegmentOutcome::Recorded(_) => self.recorded += 1,
            SegmentOutcome::Skipped(reason) => *self.skipped.entry(*reason).or_insert(0) += 1,
        }
    }

    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} recorded, {} skipped of {} source segments ({} target)",
            self.recorded,
            self.total_skipped(),
            self.source_segments,
            self.target_segments
        )?;

        let mut reasons: Vec<_> = self.skipped.iter().collect();
        reasons.sort();
        for (reason, count) in reasons {
            write!(f, "; {}: {}", reason, count)?;
        }
        Ok(())
    }
}
