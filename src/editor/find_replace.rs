//! Find and replace
//!
//! Literal or regex search over the document text, with case sensitivity
//! and whole-word options, wrap-around navigation and replace / replace all.
//! Literal terms are escaped and run through the same regex engine, so
//! case-insensitive matching never shifts byte offsets.

use log::debug;
use regex::Regex;

// ─────────────────────────────────────────────────────────────────────────────
// Find State
// ─────────────────────────────────────────────────────────────────────────────

/// Search term, options and the matches found for them.
#[derive(Debug, Clone, Default)]
pub struct FindState {
    /// Current search term
    pub search_term: String,
    /// Current replacement text
    pub replace_term: String,
    /// Whether search is case-sensitive
    pub case_sensitive: bool,
    /// Whether to match whole words only
    pub whole_word: bool,
    /// Whether to use regex matching
    pub use_regex: bool,
    /// Current match index (0-indexed)
    pub current_match: usize,
    /// All matches as (start, end) byte positions
    pub matches: Vec<(usize, usize)>,
}

impl FindState {
    /// Create a new FindState.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a literal, case-insensitive search.
    pub fn literal(term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            ..Self::default()
        }
    }

    fn build_regex(&self) -> Option<Regex> {
        let body = if self.use_regex {
            self.search_term.clone()
        } else {
            regex::escape(&self.search_term)
        };
        let body = if self.whole_word {
            format!(r"\b(?:{})\b", body)
        } else {
            body
        };
        let pattern = if self.case_sensitive {
            body
        } else {
            format!("(?i){}", body)
        };

        match Regex::new(&pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                debug!("Invalid search pattern '{}': {}", self.search_term, e);
                None
            }
        }
    }

    /// Find all matches in the given text.
    ///
    /// Updates `self.matches` and returns the number of matches found. An
    /// invalid regex yields no matches.
    pub fn find_matches(&mut self, text: &str) -> usize {
        self.matches.clear();

        if self.search_term.is_empty() {
            return 0;
        }

        if let Some(re) = self.build_regex() {
            self.matches.extend(
                re.find_iter(text)
                    .filter(|m| !m.is_empty())
                    .map(|m| (m.start(), m.end())),
            );
        }

        // Clamp current_match to valid range
        if self.current_match >= self.matches.len() {
            self.current_match = 0;
        }

        self.matches.len()
    }

    /// Make the first match starting at or after `offset` current.
    ///
    /// Wraps to the first match when none follows `offset`.
    pub fn select_from(&mut self, offset: usize) -> Option<(usize, usize)> {
        if self.matches.is_empty() {
            return None;
        }
        self.current_match = self
            .matches
            .iter()
            .position(|&(start, _)| start >= offset)
            .unwrap_or(0);
        self.current_match_position()
    }

    /// Make the last match ending at or before `offset` current.
    ///
    /// Wraps to the last match when none precedes `offset`.
    pub fn select_before(&mut self, offset: usize) -> Option<(usize, usize)> {
        if self.matches.is_empty() {
            return None;
        }
        self.current_match = self
            .matches
            .iter()
            .rposition(|&(_, end)| end <= offset)
            .unwrap_or(self.matches.len() - 1);
        self.current_match_position()
    }

    /// Move to the next match.
    ///
    /// Returns the new current match index, or None if no matches.
    pub fn next_match(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        self.current_match = (self.current_match + 1) % self.matches.len();
        Some(self.current_match)
    }

    /// Move to the previous match.
    ///
    /// Returns the new current match index, or None if no matches.
    pub fn prev_match(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        self.current_match = if self.current_match == 0 {
            self.matches.len() - 1
        } else {
            self.current_match - 1
        };
        Some(self.current_match)
    }

    /// Get the current match position.
    ///
    /// Returns (start, end) byte positions or None if no matches.
    pub fn current_match_position(&self) -> Option<(usize, usize)> {
        self.matches.get(self.current_match).copied()
    }

    /// Replace the current match in the text.
    ///
    /// Returns the new text if a replacement was made, or None if no current match.
    pub fn replace_current(&self, text: &str) -> Option<String> {
        let (start, end) = self.current_match_position()?;
        let mut new_text = String::with_capacity(text.len());
        new_text.push_str(text.get(..start)?);
        new_text.push_str(&self.replace_term);
        new_text.push_str(text.get(end..)?);
        Some(new_text)
    }

    /// Replace all matches in the text.
    ///
    /// Returns the new text with all replacements made.
    pub fn replace_all(&self, text: &str) -> String {
        if self.matches.is_empty() {
            return text.to_string();
        }

        let mut new_text = String::with_capacity(text.len());
        let mut last_end = 0;

        for &(start, end) in &self.matches {
            new_text.push_str(&text[last_end..start]);
            new_text.push_str(&self.replace_term);
            last_end = end;
        }

        new_text.push_str(&text[last_end..]);
        new_text
    }

    /// Clear all matches and reset state.
    pub fn clear(&mut self) {
        self.matches.clear();
        self.current_match = 0;
    }

    /// Check if there are any matches.
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Get the total number of matches.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_literal_case_insensitive() {
        let mut state = FindState::literal("hello");
        assert_eq!(state.find_matches("Hello world, hello again, HELLO"), 3);
        assert_eq!(state.matches[0], (0, 5));
    }

    #[test]
    fn test_find_literal_case_sensitive() {
        let mut state = FindState::literal("Hello");
        state.case_sensitive = true;
        assert_eq!(state.find_matches("Hello hello HELLO"), 1);
    }

    #[test]
    fn test_literal_term_is_not_a_regex() {
        let mut state = FindState::literal("a.b");
        assert_eq!(state.find_matches("a.b axb"), 1);
    }

    #[test]
    fn test_case_folding_keeps_offsets() {
        // 'İ' lowercases to two chars; offsets must still index the original
        let mut state = FindState::literal("x");
        state.find_matches("İx");
        let (start, end) = state.matches[0];
        assert_eq!(&"İx"[start..end], "x");
    }

    #[test]
    fn test_find_whole_word() {
        let mut state = FindState::literal("cat");
        state.whole_word = true;
        assert_eq!(state.find_matches("cat category concat cat"), 2);
    }

    #[test]
    fn test_find_regex() {
        let mut state = FindState::literal(r"\d+");
        state.use_regex = true;
        assert_eq!(state.find_matches("a1 b22 c333"), 3);
        assert_eq!(state.matches[2], (8, 11));
    }

    #[test]
    fn test_invalid_regex_yields_no_matches() {
        let mut state = FindState::literal("(unclosed");
        state.use_regex = true;
        assert_eq!(state.find_matches("(unclosed"), 0);
    }

    #[test]
    fn test_empty_term() {
        let mut state = FindState::new();
        assert_eq!(state.find_matches("anything"), 0);
        assert!(!state.has_matches());
    }

    #[test]
    fn test_navigation_wraps() {
        let mut state = FindState::literal("a");
        state.find_matches("a a a");
        assert_eq!(state.next_match(), Some(1));
        assert_eq!(state.next_match(), Some(2));
        assert_eq!(state.next_match(), Some(0));
        assert_eq!(state.prev_match(), Some(2));
    }

    #[test]
    fn test_select_from_offset() {
        let mut state = FindState::literal("x");
        state.find_matches("x..x..x");
        assert_eq!(state.select_from(1), Some((3, 4)));
        assert_eq!(state.select_from(7), Some((0, 1)));
    }

    #[test]
    fn test_select_before_offset() {
        let mut state = FindState::literal("x");
        state.find_matches("x..x..x");
        assert_eq!(state.select_before(3), Some((0, 1)));
        assert_eq!(state.select_before(0), Some((6, 7)));
    }

    #[test]
    fn test_replace_current() {
        let mut state = FindState::literal("cat");
        state.replace_term = "dog".to_string();
        state.find_matches("cat and cat");
        state.next_match();
        assert_eq!(state.replace_current("cat and cat").unwrap(), "cat and dog");
    }

    #[test]
    fn test_replace_all_case_insensitive() {
        let text = "Foo foo FOO";
        let mut state = FindState::literal("foo");
        state.replace_term = "bar".to_string();
        state.find_matches(text);
        assert_eq!(state.replace_all(text), "bar bar bar");
    }

    #[test]
    fn test_replace_all_without_matches() {
        let state = FindState::literal("zzz");
        assert_eq!(state.replace_all("unchanged"), "unchanged");
    }
}
