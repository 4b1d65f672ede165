/*!
 * Bilingual keyword alignment.
 *
 * - `aligner`: timestamp matching between the source and target tracks
 * - `cleaner`: removal of asides and proper nouns before keyword scoring
 * - `highlight`: whole-word verification and marker insertion
 * - `pipeline`: the staged per-segment run that ties everything together
 * - `result`: mapping, phrase pairs, skip reasons and counters
 */

pub use self::aligner::{AlignedPair, AlignmentStrategy, SegmentAligner, DEFAULT_TIME_THRESHOLD};
pub use self::cleaner::{ProperNounFilter, TextCleaner};
pub use self::highlight::{HighlightMarkers, HighlightMatcher};
pub use self::pipeline::AlignmentPipeline;
pub use self::result::{AlignmentReport, AlignmentResult, KeywordMatch, PipelineStats, SegmentOutcome, SkipReason};

pub mod aligner;
pub mod cleaner;
pub mod highlight;
pub mod pipeline;
pub mod result;
