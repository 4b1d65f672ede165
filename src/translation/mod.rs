/*!
 * Keyword translation.
 *
 * - `Translator`: the translation capability consumed by the alignment pipeline
 * - `cache`: bounded LRU memoization of translations and the
 *   `CachedTranslator` decorator that puts it in front of any translator
 */

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::TranslationError;

pub use self::cache::{CacheStats, CachedTranslator, TranslationCache};

pub mod cache;

/// Translates a short piece of text (a keyword) between two languages
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError>;
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for Arc<T> {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        (**self).translate(text, source_language, target_language).await
    }
}
