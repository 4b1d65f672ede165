/*!
 * Keyword extraction capability.
 *
 * The alignment pipeline asks an extractor for the single most salient token
 * of a cleaned caption line. Any scoring algorithm can sit behind the
 * `KeywordExtractor` trait; `FrequencyExtractor` is the built-in default.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use self::frequency::FrequencyExtractor;

pub mod frequency;

/// A candidate keyword and its salience score (higher is more salient)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredKeyword {
    pub keyword: String,
    pub score: f64,
}

impl ScoredKeyword {
    pub fn new(keyword: impl Into<String>, score: f64) -> Self {
        Self {
            keyword: keyword.into(),
            score,
        }
    }
}

/// Extracts ranked keywords from a line of text
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    /// Return at most `top_n` keywords of up to `ngram` words, best first.
    /// An empty result is a normal outcome, not an error.
    async fn extract(&self, text: &str, language: &str, top_n: usize, ngram: usize) -> Vec<ScoredKeyword>;
}
