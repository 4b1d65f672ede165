/*!
 * Translation caching functionality.
 *
 * This module provides a bounded least-recently-used cache for keyword
 * translations so repeated keywords do not hit the translator again.
 * All state sits behind one lock; clones share the same storage, so a
 * single cache can be handed to several concurrent pipeline runs.
 */

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use async_trait::async_trait;
use parking_lot::Mutex;
use log::debug;

use super::Translator;
use crate::errors::TranslationError;

/// Default number of cached translations
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Cache key combining source text, source language, and target language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Source text to translate
    source_text: String,

    /// Source language code
    source_language: String,

    /// Target language code
    target_language: String,
}

impl CacheKey {
    fn new(source_text: &str, source_language: &str, target_language: &str) -> Self {
        Self {
            source_text: source_text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        }
    }
}

/// Hit/miss counters of a cache
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub evictions: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

#[derive(Debug)]
struct LruState {
    /// key -> (translation, last-use tick)
    entries: HashMap<CacheKey, (String, u64)>,
    /// last-use tick -> key, oldest first
    recency: BTreeMap<u64, CacheKey>,
    tick: u64,
    stats: CacheStats,
}

impl LruState {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            tick: 0,
            stats: CacheStats::default(),
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn touch(&mut self, key: &CacheKey) -> Option<String> {
        let tick = self.next_tick();
        let (value, last_used) = self.entries.get_mut(key)?;
        let previous = std::mem::replace(last_used, tick);
        let value = value.clone();
        self.recency.remove(&previous);
        self.recency.insert(tick, key.clone());
        Some(value)
    }

    fn insert(&mut self, key: CacheKey, value: String, capacity: usize) {
        let tick = self.next_tick();
        if let Some((_, previous)) = self.entries.insert(key.clone(), (value, tick)) {
            self.recency.remove(&previous);
        } else if self.entries.len() > capacity {
            if let Some((_, oldest)) = self.recency.pop_first() {
                self.entries.remove(&oldest);
                self.stats.evictions += 1;
            }
        }
        self.recency.insert(tick, key);
    }
}

/// Bounded LRU cache of keyword translations
pub struct TranslationCache {
    /// Shared cache state
    state: Arc<Mutex<LruState>>,

    /// Maximum number of entries kept
    capacity: usize,

    /// Whether caching is enabled
    enabled: bool,
}

impl TranslationCache {
    /// Create an enabled cache holding at most `capacity` entries (at least one)
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(LruState::new())),
            capacity: capacity.max(1),
            enabled: true,
        }
    }

    /// Create a cache that never stores anything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(1)
        }
    }

    /// Get a translation from the cache, marking it most recently used
    pub fn get(&self, source_text: &str, source_language: &str, target_language: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::new(source_text, source_language, target_language);
        let mut state = self.state.lock();

        match state.touch(&key) {
            Some(translation) => {
                state.stats.hits += 1;
                debug!("Cache hit for '{}' ({} -> {})", source_text, source_language, target_language);
                Some(translation)
            }
            None => {
                state.stats.misses += 1;
                debug!("Cache miss for '{}' ({} -> {})", source_text, source_language, target_language);
                None
            }
        }
    }

    /// Store a translation, evicting the least recently used entry when full
    pub fn store(&self, source_text: &str, source_language: &str, target_language: &str, translation: &str) {
        if !self.enabled {
            return;
        }

        let key = CacheKey::new(source_text, source_language, target_language);
        self.state.lock().insert(key, translation.to_string(), self.capacity);
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    /// Clear the cache and its counters
    pub fn clear(&self) {
        let mut state = self.state.lock();
        *state = LruState::new();
        debug!("Translation cache cleared");
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl Clone for TranslationCache {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            capacity: self.capacity,
            enabled: self.enabled,
        }
    }
}

/// A translator with a `TranslationCache` in front of it.
///
/// The lock is never held across the inner translator call, so two
/// concurrent misses on the same key may both reach the translator; the
/// later result simply overwrites the earlier one. Failures are not cached.
pub struct CachedTranslator<T> {
    inner: T,
    cache: TranslationCache,
}

impl<T: Translator> CachedTranslator<T> {
    pub fn new(inner: T, cache: TranslationCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Translator> Translator for CachedTranslator<T> {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        if let Some(cached) = self.cache.get(text, source_language, target_language) {
            return Ok(cached);
        }

        let translation = self.inner.translate(text, source_language, target_language).await?;
        self.cache.store(text, source_language, target_language, &translation);
        Ok(translation)
    }
}
