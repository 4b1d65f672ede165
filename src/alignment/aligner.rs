use serde::{Deserialize, Serialize};

use crate::captions::CaptionSegment;

/// Default maximum start/end deviation in seconds
pub const DEFAULT_TIME_THRESHOLD: f64 = 0.5;

/// How a target segment is chosen when several fall within the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentStrategy {
    /// First qualifying target segment in track order
    #[default]
    FirstMatch,
    /// Qualifying target with the smallest `|Δstart| + |Δend|`, earliest on ties
    ClosestMatch,
}

impl std::str::FromStr for AlignmentStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "first" | "first_match" => Ok(Self::FirstMatch),
            "closest" | "closest_match" => Ok(Self::ClosestMatch),
            _ => Err(anyhow::anyhow!("Invalid alignment strategy: {}", s)),
        }
    }
}

/// A source segment and its temporal counterpart, if any
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair<'a> {
    pub source: &'a CaptionSegment,
    pub target: Option<&'a CaptionSegment>,
}

/// Matches caption segments across tracks by timestamps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentAligner {
    time_threshold: f64,
    strategy: AlignmentStrategy,
}

impl SegmentAligner {
    pub fn new(time_threshold: f64, strategy: AlignmentStrategy) -> Self {
        Self { time_threshold, strategy }
    }

    pub fn time_threshold(&self) -> f64 {
        self.time_threshold
    }

    pub fn strategy(&self) -> AlignmentStrategy {
        self.strategy
    }

    /// Both the start and the end deltas must be strictly below the threshold
    pub fn is_aligned(&self, source: &CaptionSegment, target: &CaptionSegment) -> bool {
        (source.start - target.start).abs() < self.time_threshold
            && (source.end() - target.end()).abs() < self.time_threshold
    }

    /// Find the target segment corresponding to `source`
    pub fn find_match<'a>(&self, source: &CaptionSegment, targets: &'a [CaptionSegment]) -> Option<&'a CaptionSegment> {
        let mut candidates = targets.iter().filter(|target| self.is_aligned(source, target));

        match self.strategy {
            AlignmentStrategy::FirstMatch => candidates.next(),
            AlignmentStrategy::ClosestMatch => candidates.fold(None::<&'a CaptionSegment>, |best, candidate| {
                match best {
                    Some(current) if combined_delta(source, current) <= combined_delta(source, candidate) => Some(current),
                    _ => Some(candidate),
                }
            }),
        }
    }

    /// Pair every source segment with its counterpart
    pub fn align<'a>(&self, sources: &'a [CaptionSegment], targets: &'a [CaptionSegment]) -> Vec<AlignedPair<'a>> {
        sources
            .iter()
            .map(|source| AlignedPair {
                source,
                target: self.find_match(source, targets),
            })
            .collect()
    }
}

impl Default for SegmentAligner {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_THRESHOLD, AlignmentStrategy::default())
    }
}

fn combined_delta(source: &CaptionSegment, target: &CaptionSegment) -> f64 {
    (source.start - target.start).abs() + (source.end() - target.end()).abs()
}
