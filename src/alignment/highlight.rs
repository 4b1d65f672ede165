/*!
 * Whole-word keyword verification and highlighting.
 *
 * A keyword "occurs" in a line when it matches case-insensitively between
 * word boundaries. The keyword is always escaped, so characters such as `.`
 * or `+` are taken literally. Matched spans keep the casing of the line;
 * only the markers are inserted.
 */

use log::debug;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

const ANSI_OPEN: &str = "\x1b[1;33m";
const ANSI_CLOSE: &str = "\x1b[0m";

/// In-band decoration wrapped around every verified occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightMarkers {
    pub open: String,
    pub close: String,
}

impl HighlightMarkers {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Bold yellow terminal escape codes
    pub fn ansi() -> Self {
        Self::new(ANSI_OPEN, ANSI_CLOSE)
    }

    /// HTML `<mark>` element
    pub fn html() -> Self {
        Self::new("<mark>", "</mark>")
    }
}

impl Default for HighlightMarkers {
    fn default() -> Self {
        Self::ansi()
    }
}

#[derive(Debug, Clone, Default)]
pub struct HighlightMatcher {
    markers: HighlightMarkers,
}

impl HighlightMatcher {
    pub fn new(markers: HighlightMarkers) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &HighlightMarkers {
        &self.markers
    }

    /// Wrap every whole-word occurrence of `keyword` in `text`.
    ///
    /// Returns the decorated text and whether anything matched. Without a
    /// match (or with a blank keyword) the text comes back unchanged.
    pub fn highlight(&self, text: &str, keyword: &str) -> (String, bool) {
        if keyword.trim().is_empty() {
            return (text.to_string(), false);
        }

        let pattern = format!(r"\b{}\b", regex::escape(keyword));
        let regex = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(regex) => regex,
            Err(e) => {
                debug!("Cannot build highlight pattern for '{}': {}", keyword, e);
                return (text.to_string(), false);
            }
        };

        if !regex.is_match(text) {
            return (text.to_string(), false);
        }

        let highlighted = regex.replace_all(text, |caps: &regex::Captures| {
            format!("{}{}{}", self.markers.open, &caps[0], self.markers.close)
        });
        (highlighted.into_owned(), true)
    }

    /// Whether `keyword` occurs as a whole word in `text`
    pub fn contains(&self, text: &str, keyword: &str) -> bool {
        self.highlight(text, keyword).1
    }

    /// Remove every marker, restoring the undecorated text.
    ///
    /// Marker strings that were already part of the line are removed as
    /// well, so the round trip only holds for lines free of marker text.
    pub fn strip_markers(&self, text: &str) -> String {
        text.replace(&self.markers.open, "").replace(&self.markers.close, "")
    }
}
