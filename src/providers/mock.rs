/*!
 * Offline translators for tests and dry runs.
 *
 * - `MockTranslator::dictionary(..)` - looks words up in a fixed table
 * - `MockTranslator::echo()` - returns the input unchanged
 * - `MockTranslator::failing()` - always fails with a provider error
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::{ProviderError, TranslationError};
use crate::translation::Translator;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Translate from the dictionary, failing for unknown words
    Dictionary,
    /// Return the text unchanged
    Echo,
    /// Always fail
    Failing,
    /// Fail every Nth request, echo otherwise
    Intermittent { fail_every: usize },
}

/// A few common words, used by `--provider mock`
const BUILTIN_EN_FR: &[(&str, &str)] = &[
    ("cat", "chat"),
    ("dog", "chien"),
    ("house", "maison"),
    ("water", "eau"),
    ("bread", "pain"),
    ("book", "livre"),
    ("car", "voiture"),
    ("city", "ville"),
    ("friend", "ami"),
    ("time", "temps"),
    ("world", "monde"),
    ("music", "musique"),
    ("coffee", "café"),
    ("night", "nuit"),
    ("morning", "matin"),
];

/// Mock translator with a shared request counter
#[derive(Debug, Clone)]
pub struct MockTranslator {
    behavior: MockBehavior,
    dictionary: Arc<HashMap<String, String>>,
    request_count: Arc<AtomicUsize>,
}

impl MockTranslator {
    pub fn new(behavior: MockBehavior, dictionary: HashMap<String, String>) -> Self {
        Self {
            behavior,
            dictionary: Arc::new(dictionary),
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Dictionary lookup over `(word, translation)` pairs, case-insensitive on the word
    pub fn dictionary<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let dictionary = entries
            .into_iter()
            .map(|(word, translation)| (word.to_lowercase(), translation.to_string()))
            .collect();
        Self::new(MockBehavior::Dictionary, dictionary)
    }

    /// Small built-in English to French dictionary
    pub fn builtin() -> Self {
        Self::dictionary(BUILTIN_EN_FR.iter().copied())
    }

    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo, HashMap::new())
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing, HashMap::new())
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) }, HashMap::new())
    }

    /// Number of `translate` calls so far, across clones
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, _source_language: &str, _target_language: &str) -> Result<String, TranslationError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Dictionary => self
                .dictionary
                .get(&text.trim().to_lowercase())
                .cloned()
                .ok_or_else(|| TranslationError::Failed(format!("No dictionary entry for '{}'", text))),
            MockBehavior::Echo => Ok(text.to_string()),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }
            .into()),
            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                    }
                    .into())
                } else {
                    Ok(text.to_string())
                }
            }
        }
    }
}
