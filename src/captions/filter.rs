use serde::{Deserialize, Serialize};

use super::CaptionSegment;

/// Keeps segments that start early enough and stay on screen long enough.
///
/// A segment survives iff `start <= max_time` and `duration >= min_duration`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentFilter {
    /// Latest accepted start time in seconds
    pub max_time: f64,

    /// Shortest accepted duration in seconds
    pub min_duration: f64,
}

impl SegmentFilter {
    pub fn new(max_time: f64, min_duration: f64) -> Self {
        Self { max_time, min_duration }
    }

    pub fn accepts(&self, segment: &CaptionSegment) -> bool {
        segment.start <= self.max_time && segment.duration >= self.min_duration
    }

    /// Order-preserving subsequence of the accepted segments
    pub fn apply(&self, segments: &[CaptionSegment]) -> Vec<CaptionSegment> {
        segments.iter().filter(|s| self.accepts(s)).cloned().collect()
    }
}

impl Default for SegmentFilter {
    fn default() -> Self {
        Self::new(60.0, 2.0)
    }
}
