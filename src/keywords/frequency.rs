use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use super::{KeywordExtractor, ScoredKeyword};
use crate::language_utils;

static WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

const STOPWORDS_EN: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "of", "to", "in", "on", "at", "for", "with", "is", "are",
    "was", "were", "be", "been", "it", "its", "this", "that", "these", "those", "i", "you", "he",
    "she", "we", "they", "me", "him", "her", "us", "them", "my", "your", "our", "their", "not",
    "do", "does", "did", "have", "has", "had", "so", "just", "what", "there", "here", "from",
    "as", "by", "if", "then", "can", "will", "would", "all", "about", "very", "really", "like",
];
const STOPWORDS_FR: &[&str] = &[
    "le", "la", "les", "un", "une", "des", "et", "ou", "mais", "de", "du", "au", "aux", "en",
    "dans", "sur", "pour", "par", "avec", "est", "sont", "ce", "cet", "cette", "ces", "je", "tu",
    "il", "elle", "nous", "vous", "ils", "elles", "ne", "pas", "que", "qui", "se", "son", "sa",
    "ses", "mon", "ma", "mes", "très", "plus", "comme", "tout",
];
const STOPWORDS_ES: &[&str] = &[
    "el", "la", "los", "las", "un", "una", "unos", "unas", "y", "o", "pero", "de", "del", "al",
    "en", "con", "por", "para", "es", "son", "que", "se", "no", "lo", "su", "sus", "yo", "tu",
    "él", "ella", "nosotros", "muy", "más", "como", "este", "esta", "eso",
];
const STOPWORDS_DE: &[&str] = &[
    "der", "die", "das", "ein", "eine", "und", "oder", "aber", "von", "zu", "in", "im", "auf",
    "mit", "für", "ist", "sind", "war", "ich", "du", "er", "sie", "es", "wir", "ihr", "nicht",
    "den", "dem", "des", "sehr", "auch", "so", "wie",
];
const STOPWORDS_NL: &[&str] = &[
    "de", "het", "een", "en", "of", "maar", "van", "te", "in", "op", "met", "voor", "is", "zijn",
    "was", "ik", "jij", "je", "hij", "zij", "ze", "wij", "we", "niet", "dat", "die", "dit", "er",
    "heel", "ook", "zo", "als",
];

fn stopwords_for(language: &str) -> &'static [&'static str] {
    match language_utils::base_language_code(language).as_str() {
        "en" | "eng" => STOPWORDS_EN,
        "fr" | "fra" | "fre" => STOPWORDS_FR,
        "es" | "spa" => STOPWORDS_ES,
        "de" | "deu" | "ger" => STOPWORDS_DE,
        "nl" | "nld" | "dut" => STOPWORDS_NL,
        _ => &[],
    }
}

/// Frequency-and-length keyword scorer.
///
/// Words are lowercased; stopwords, pure numbers and words shorter than
/// `min_word_length` are ignored. A word scores `count * (1 + ln(chars))`;
/// an n-gram scores the sum of its words. Ties keep first-occurrence order,
/// so the result is deterministic.
#[derive(Debug, Clone)]
pub struct FrequencyExtractor {
    min_word_length: usize,
}

impl FrequencyExtractor {
    pub fn new(min_word_length: usize) -> Self {
        Self { min_word_length }
    }

    /// Runs of consecutive content words; stopwords break a run
    fn content_runs(&self, text: &str, language: &str) -> Vec<Vec<String>> {
        let stopwords = stopwords_for(language);
        let mut runs = Vec::new();
        let mut current = Vec::new();

        for word in WORD_REGEX.find_iter(text) {
            let word = word.as_str().to_lowercase();
            let is_content = word.chars().count() >= self.min_word_length
                && !word.chars().all(|c| c.is_numeric())
                && !stopwords.contains(&word.as_str());

            if is_content {
                current.push(word);
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }

        runs
    }
}

impl Default for FrequencyExtractor {
    fn default() -> Self {
        Self::new(2)
    }
}

#[async_trait]
impl KeywordExtractor for FrequencyExtractor {
    async fn extract(&self, text: &str, language: &str, top_n: usize, ngram: usize) -> Vec<ScoredKeyword> {
        if top_n == 0 {
            return Vec::new();
        }
        let ngram = ngram.max(1);
        let runs = self.content_runs(text, language);

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for word in runs.iter().flatten() {
            *counts.entry(word.as_str()).or_insert(0) += 1;
        }
        let word_score = |word: &str| {
            let count = counts.get(word).copied().unwrap_or(0) as f64;
            count * (1.0 + (word.chars().count() as f64).ln())
        };

        // Candidates in first-occurrence order
        let mut order: Vec<String> = Vec::new();
        let mut scores: HashMap<String, f64> = HashMap::new();
        for run in &runs {
            for size in 1..=ngram.min(run.len()) {
                for window in run.windows(size) {
                    let phrase = window.join(" ");
                    if scores.contains_key(&phrase) {
                        continue;
                    }
                    let score: f64 = window.iter().map(|w| word_score(w.as_str())).sum();
                    scores.insert(phrase.clone(), score);
                    order.push(phrase);
                }
            }
        }

        let mut ranked: Vec<ScoredKeyword> = order
            .into_iter()
            .map(|phrase| {
                let score = scores[&phrase];
                ScoredKeyword::new(phrase, score)
            })
            .collect();
        // Stable sort keeps first occurrence ahead on equal scores
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(top_n);
        ranked
    }
}
