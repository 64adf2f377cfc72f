//! Snippet expansion
//!
//! Short trigger words expand into longer markdown. The mapping starts
//! from built-in defaults and is overlaid with the user's entries from
//! `snippets.json`; user entries win on collision. `$1`, `$2`, ... in an
//! expansion are plain markers that are removed on expansion, the first
//! one marking where the cursor lands.

use crate::config::{read_json, write_json_atomic};
use crate::editor::formatting::{replace_range, FormatResult};
use crate::error::{Error, Result};
use crate::string_utils::floor_char_boundary;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Built-in `(trigger, expansion)` pairs.
const DEFAULT_SNIPPETS: &[(&str, &str)] = &[
    ("h1", "# $1"),
    ("h2", "## $1"),
    ("h3", "### $1"),
    ("bold", "**$1**"),
    ("italic", "*$1*"),
    ("strike", "~~$1~~"),
    ("link", "[$1](https://)"),
    ("img", "![$1](image.png)"),
    ("code", "```$1\n\n```"),
    (
        "mermaid",
        "```mermaid\nflowchart TD\n    A[$1] --> B\n```",
    ),
    (
        "table",
        "| Header | Header |\n| ------ | ------ |\n| $1 |  |",
    ),
    ("todo", "- [ ] $1"),
    ("done", "- [x] $1"),
    ("quote", "> $1"),
    ("hr", "---"),
    ("toc", "[TOC]"),
    ("fn", "[^$1]"),
    ("comment", "<!-- $1 -->"),
];

// ─────────────────────────────────────────────────────────────────────────────
// Snippet Library
// ─────────────────────────────────────────────────────────────────────────────

/// Trigger → expansion mapping, optionally backed by a JSON file.
#[derive(Debug, Clone)]
pub struct SnippetLibrary {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl Default for SnippetLibrary {
    fn default() -> Self {
        Self {
            path: None,
            entries: Self::defaults(),
        }
    }
}

impl SnippetLibrary {
    /// The built-in mapping.
    pub fn defaults() -> BTreeMap<String, String> {
        DEFAULT_SNIPPETS
            .iter()
            .map(|(t, e)| (t.to_string(), e.to_string()))
            .collect()
    }

    /// Library backed by `path`, merged over the defaults.
    ///
    /// A missing or unreadable file leaves the defaults in place.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut entries = Self::defaults();

        match read_json::<BTreeMap<String, String>>(&path) {
            Ok(Some(user)) => {
                debug!("Loaded {} snippets from {}", user.len(), path.display());
                entries.extend(user);
            }
            Ok(None) => debug!("No snippets file, using defaults"),
            Err(e) => warn!("Failed to load snippets: {}. Using defaults.", e),
        }

        Self {
            path: Some(path),
            entries,
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, trigger: &str) -> Option<&str> {
        self.entries.get(trigger).map(String::as_str)
    }

    /// All entries, sorted by trigger.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, e)| (t.as_str(), e.as_str()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a new snippet. Fails if the trigger is taken.
    pub fn add(&mut self, trigger: &str, expansion: &str) -> Result<()> {
        validate_trigger(trigger)?;
        if self.entries.contains_key(trigger) {
            return Err(Error::DuplicateSnippet(trigger.to_string()));
        }
        self.mutate(|entries| {
            entries.insert(trigger.to_string(), expansion.to_string());
        })
    }

    /// Replace the expansion of an existing snippet.
    pub fn update(&mut self, trigger: &str, expansion: &str) -> Result<()> {
        if !self.entries.contains_key(trigger) {
            return Err(Error::SnippetNotFound(trigger.to_string()));
        }
        self.mutate(|entries| {
            entries.insert(trigger.to_string(), expansion.to_string());
        })
    }

    /// Remove a snippet.
    pub fn remove(&mut self, trigger: &str) -> Result<()> {
        if !self.entries.contains_key(trigger) {
            return Err(Error::SnippetNotFound(trigger.to_string()));
        }
        self.mutate(|entries| {
            entries.remove(trigger);
        })
    }

    /// Apply a change and persist it; the change is undone if saving fails.
    fn mutate(&mut self, change: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let previous = self.entries.clone();
        change(&mut self.entries);
        if let Err(e) = self.save() {
            self.entries = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Write the full mapping to the backing file, if there is one.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        write_json_atomic(path, &self.entries)?;
        info!("Saved {} snippets to {}", self.entries.len(), path.display());
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expansion
    // ─────────────────────────────────────────────────────────────────────────

    /// Expand the trigger word ending at `cursor`.
    ///
    /// The word is the run of non-whitespace before the cursor. Nothing
    /// happens when the cursor sits inside a word, when the word is not a
    /// trigger, or when there is no word. On success the word is replaced by
    /// the expansion with its markers removed.
    pub fn expand(&self, text: &str, cursor: usize) -> Option<FormatResult> {
        let cursor = floor_char_boundary(text, cursor);

        if text[cursor..].chars().next().is_some_and(|c| !c.is_whitespace()) {
            return None;
        }

        let before = &text[..cursor];
        let start = before
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let trigger = &before[start..];
        if trigger.is_empty() {
            return None;
        }

        let expansion = self.entries.get(trigger)?;
        let (body, placeholder) = strip_placeholders(expansion);
        debug!("Expanding snippet '{}'", trigger);

        let mut result = replace_range(text, (start, cursor), &body);
        if let Some(offset) = placeholder {
            result.cursor = start + offset;
        }
        Some(result)
    }
}

fn validate_trigger(trigger: &str) -> Result<()> {
    if trigger.is_empty() || trigger.chars().any(char::is_whitespace) {
        return Err(Error::InvalidSnippetTrigger(trigger.to_string()));
    }
    Ok(())
}

/// Remove `$1`..`$9` markers, returning the text and the offset of the first one.
///
/// A marker is a single digit after `$`; longer digit runs such as `$100`
/// are ordinary text.
fn strip_placeholders(expansion: &str) -> (String, Option<usize>) {
    let mut out = String::with_capacity(expansion.len());
    let mut first = None;
    let mut chars = expansion.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' {
            let mut ahead = chars.clone();
            let is_marker = ahead.next().is_some_and(|n| ('1'..='9').contains(&n))
                && !ahead.next().is_some_and(|n| n.is_ascii_digit());
            if is_marker {
                chars.next();
                first.get_or_insert(out.len());
                continue;
            }
        }
        out.push(c);
    }

    (out, first)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_expand_known_trigger() {
        let lib = SnippetLibrary::default();
        let result = lib.expand("Intro\nh2", 8).unwrap();
        assert_eq!(result.text, "Intro\n## ");
        assert_eq!(result.cursor, 9);
    }

    #[test]
    fn test_cursor_lands_on_first_marker() {
        let lib = SnippetLibrary::default();
        let result = lib.expand("see link now", 8).unwrap();
        assert_eq!(result.text, "see [](https://) now");
        assert_eq!(result.cursor, 5);
    }

    #[test]
    fn test_expansion_without_marker_puts_cursor_at_end() {
        let lib = SnippetLibrary::default();
        let result = lib.expand("hr", 2).unwrap();
        assert_eq!(result.text, "---");
        assert_eq!(result.cursor, 3);
    }

    #[test]
    fn test_unknown_trigger_is_noop() {
        let lib = SnippetLibrary::default();
        assert!(lib.expand("nothing here", 12).is_none());
    }

    #[test]
    fn test_no_expansion_mid_word() {
        let lib = SnippetLibrary::default();
        // cursor between "h1" and "x"
        assert!(lib.expand("h1x", 2).is_none());
    }

    #[test]
    fn test_no_expansion_after_whitespace() {
        let lib = SnippetLibrary::default();
        assert!(lib.expand("h1 ", 3).is_none());
        assert!(lib.expand("", 0).is_none());
    }

    #[test]
    fn test_trigger_must_be_whole_token() {
        let lib = SnippetLibrary::default();
        assert!(lib.expand("xh1", 3).is_none());
    }

    #[test]
    fn test_strip_placeholders() {
        assert_eq!(
            strip_placeholders("a $1 b $2 c"),
            ("a  b  c".to_string(), Some(2))
        );
        assert_eq!(strip_placeholders("costs $"), ("costs $".to_string(), None));
    }

    #[test]
    fn test_dollar_amounts_are_kept() {
        assert_eq!(
            strip_placeholders("costs $100, or $0"),
            ("costs $100, or $0".to_string(), None)
        );

        let dir = TempDir::new().unwrap();
        let mut lib = SnippetLibrary::load(dir.path().join("snippets.json"));
        lib.add("price", "costs $100").unwrap();
        assert_eq!(lib.expand("price", 5).unwrap().text, "costs $100");
    }

    #[test]
    fn test_user_entries_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snippets.json");
        fs::write(&path, r##"{"h1": "# Title", "sig": "Regards"}"##).unwrap();

        let lib = SnippetLibrary::load(&path);
        assert_eq!(lib.get("h1"), Some("# Title"));
        assert_eq!(lib.get("sig"), Some("Regards"));
        assert_eq!(lib.get("hr"), Some("---"));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snippets.json");
        fs::write(&path, "{not json").unwrap();

        let lib = SnippetLibrary::load(&path);
        assert_eq!(lib.len(), DEFAULT_SNIPPETS.len());
    }

    #[test]
    fn test_management_persists_full_mapping() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snippets.json");

        let mut lib = SnippetLibrary::load(&path);
        lib.add("sig", "Best regards").unwrap();
        lib.update("hr", "***").unwrap();
        lib.remove("toc").unwrap();

        let stored: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(stored.get("sig").map(String::as_str), Some("Best regards"));
        assert_eq!(stored.get("hr").map(String::as_str), Some("***"));
        assert!(!stored.contains_key("toc"));
        assert!(stored.contains_key("h1"));

        let reloaded = SnippetLibrary::load(&path);
        assert_eq!(reloaded.get("sig"), Some("Best regards"));
    }

    #[test]
    fn test_management_errors() {
        let mut lib = SnippetLibrary::default();
        assert!(matches!(lib.add("h1", "x"), Err(Error::DuplicateSnippet(_))));
        assert!(matches!(
            lib.add("two words", "x"),
            Err(Error::InvalidSnippetTrigger(_))
        ));
        assert!(matches!(lib.update("nope", "x"), Err(Error::SnippetNotFound(_))));
        assert!(matches!(lib.remove("nope"), Err(Error::SnippetNotFound(_))));
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail
        let path = dir.path().join("snippets.json");
        fs::create_dir(&path).unwrap();

        let mut lib = SnippetLibrary::load(&path);
        assert!(lib.add("sig", "Regards").is_err());
        assert!(lib.get("sig").is_none());
    }
}
