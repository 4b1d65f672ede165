use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::language_utils;

// Non-nested parenthetical asides such as "(Laughs)" or "(music)"
static PARENTHETICAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)").expect("parenthetical pattern is valid"));

/// When tokens starting with an uppercase letter are treated as proper nouns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProperNounFilter {
    /// Drop capitalized tokens only for languages whose script has letter case
    #[default]
    Auto,
    /// Drop capitalized tokens for every language
    Always,
    /// Keep every token
    Never,
}

impl ProperNounFilter {
    pub fn applies_to(&self, language: &str) -> bool {
        match self {
            Self::Auto => language_utils::has_letter_case(language),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Prepares a caption line for keyword scoring.
///
/// Parenthetical spans are removed first, then capitalized tokens (when the
/// filter applies to the line's language), and the rest is rejoined with
/// single spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCleaner {
    proper_nouns: ProperNounFilter,
}

impl TextCleaner {
    pub fn new(proper_nouns: ProperNounFilter) -> Self {
        Self { proper_nouns }
    }

    pub fn clean(&self, text: &str, language: &str) -> String {
        let without_asides = PARENTHETICAL_REGEX.replace_all(text, "");
        let drop_capitalized = self.proper_nouns.applies_to(language);

        without_asides
            .split_whitespace()
            .filter(|token| !(drop_capitalized && starts_uppercase(token)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn starts_uppercase(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase)
}
