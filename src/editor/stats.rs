//! Document statistics
//!
//! [`compute_stats`] derives every count shown in the status bar and the
//! statistics panel from the raw text. It is a pure function, cheap enough
//! to run on every debounced edit.

use crate::editor::outline::is_heading;
use crate::markdown::diagram::fenced_blocks;

/// Average reading speed used for the reading time estimate.
pub const WORDS_PER_MINUTE: usize = 200;

// ─────────────────────────────────────────────────────────────────────────────
// Statistics
// ─────────────────────────────────────────────────────────────────────────────

/// Counts derived from a document.
///
/// # Example
///
/// ```ignore
/// let stats = compute_stats("Hello, World!\n\nNew paragraph.");
/// assert_eq!(stats.words, 4);
/// assert_eq!(stats.paragraphs, 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Number of lines (an empty document has none)
    pub lines: usize,
    /// Number of whitespace-delimited tokens
    pub words: usize,
    /// Number of characters including whitespace
    pub characters: usize,
    /// Number of characters excluding whitespace
    pub characters_no_spaces: usize,
    /// Number of blank-line-delimited blocks
    pub paragraphs: usize,
    /// Number of ATX heading lines
    pub headings: usize,
    /// Number of `[text](url)` links
    pub links: usize,
    /// Number of `![alt](url)` images
    pub images: usize,
    /// Number of fenced code blocks, diagram blocks included
    pub code_blocks: usize,
    /// Number of fenced diagram blocks
    pub diagram_blocks: usize,
    /// Estimated reading time in minutes (never below 1)
    pub read_time_minutes: usize,
}

impl Statistics {
    /// Fraction of `goal` words written, or `None` when no goal is set.
    pub fn goal_progress(&self, goal: u32) -> Option<f32> {
        if goal == 0 {
            None
        } else {
            Some(self.words as f32 / goal as f32)
        }
    }

    /// Format the statistics for display in the status bar.
    ///
    /// Returns a compact string like "150 words | 892 chars | 25 lines"
    pub fn format_compact(&self) -> String {
        format!(
            "{} words | {} chars | {} lines",
            self.words, self.characters, self.lines
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Computation
// ─────────────────────────────────────────────────────────────────────────────

/// Compute all statistics for `text`.
pub fn compute_stats(text: &str) -> Statistics {
    let mut stats = Statistics {
        words: text.split_whitespace().count(),
        ..Statistics::default()
    };

    for ch in text.chars() {
        stats.characters += 1;
        if !ch.is_whitespace() {
            stats.characters_no_spaces += 1;
        }
    }

    let mut in_paragraph = false;
    for line in text.lines() {
        stats.lines += 1;

        let blank = line.trim().is_empty();
        if !blank && !in_paragraph {
            stats.paragraphs += 1;
        }
        in_paragraph = !blank;

        if is_heading(line) {
            stats.headings += 1;
        }
    }

    let (links, images) = count_links_and_images(text);
    stats.links = links;
    stats.images = images;

    let fences = fenced_blocks(text);
    stats.code_blocks = fences.len();
    stats.diagram_blocks = fences.iter().filter(|f| f.is_diagram()).count();
    stats.read_time_minutes = (stats.words / WORDS_PER_MINUTE).max(1);
    stats
}

/// Count `[text](url)` links and `![alt](url)` images.
///
/// Neither part may contain its own closing delimiter, so nested brackets
/// are not recognised.
fn count_links_and_images(text: &str) -> (usize, usize) {
    let bytes = text.as_bytes();
    let (mut links, mut images) = (0, 0);
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'[' {
            if let Some(end) = match_link_at(bytes, i) {
                if i > 0 && bytes[i - 1] == b'!' {
                    images += 1;
                } else {
                    links += 1;
                }
                i = end;
                continue;
            }
        }
        i += 1;
    }
    (links, images)
}

/// If a `[..](..)` construct starts at `open`, return the index just past it.
fn match_link_at(bytes: &[u8], open: usize) -> Option<usize> {
    let close = open + 1 + bytes[open + 1..].iter().position(|&b| b == b']')?;
    if bytes.get(close + 1) != Some(&b'(') {
        return None;
    }
    let paren = close + 2 + bytes[close + 2..].iter().position(|&b| b == b')')?;
    Some(paren + 1)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_empty_text() {
        let stats = compute_stats("");
        assert_eq!(stats.lines, 0);
        assert_eq!(stats.words, 0);
        assert_eq!(stats.characters, 0);
        assert_eq!(stats.characters_no_spaces, 0);
        assert_eq!(stats.paragraphs, 0);
        assert_eq!(stats.headings, 0);
        assert_eq!(stats.links, 0);
        assert_eq!(stats.images, 0);
        assert_eq!(stats.code_blocks, 0);
        assert_eq!(stats.diagram_blocks, 0);
        // The minimum floor applies even to an empty document
        assert_eq!(stats.read_time_minutes, 1);
    }

    #[test]
    fn test_words_and_chars_identities() {
        let samples = [
            "Hello, World!",
            "  leading and trailing  ",
            "tabs\tand\nnewlines\r\nmixed",
            "유니코드 텍스트 ünïcödé",
            "\n\n\n",
            "# Title\n\n- item one\n- item two\n",
        ];
        for text in samples {
            let stats = compute_stats(text);
            assert_eq!(stats.words, text.split_whitespace().count(), "{:?}", text);
            assert_eq!(stats.characters, text.chars().count(), "{:?}", text);
        }
    }

    #[test]
    fn test_characters_no_spaces() {
        let stats = compute_stats("a b\tc\nd");
        assert_eq!(stats.characters, 7);
        assert_eq!(stats.characters_no_spaces, 4);
    }

    #[test]
    fn test_lines() {
        assert_eq!(compute_stats("one").lines, 1);
        assert_eq!(compute_stats("one\ntwo\nthree").lines, 3);
        assert_eq!(compute_stats("one\n").lines, 1);
    }

    #[test]
    fn test_paragraphs() {
        let text =
            "Paragraph one here.\n\nParagraph two.\nStill paragraph two.\n\n  \nParagraph three.";
        assert_eq!(compute_stats(text).paragraphs, 3);
        assert_eq!(compute_stats("single line").paragraphs, 1);
    }

    #[test]
    fn test_headings_follow_outline_rule() {
        let text = "# One\n## Two\n#NotOne\n####### NotSeven\ntext";
        assert_eq!(compute_stats(text).headings, 2);
    }

    #[test]
    fn test_links_and_images() {
        let text = "See [docs](https://example.com) and [home](/).\n![logo](logo.png)";
        let stats = compute_stats(text);
        assert_eq!(stats.links, 2);
        assert_eq!(stats.images, 1);
    }

    #[test]
    fn test_unclosed_link_is_not_counted() {
        let stats = compute_stats("[broken](no end and [ok](x)");
        assert_eq!(stats.links, 1);
        assert_eq!(compute_stats("[just brackets] (space)").links, 0);
    }

    #[test]
    fn test_code_and_diagram_blocks() {
        let text = "```rust\nfn main() {}\n```\n\n```mermaid\nflowchart TD\n A-->B\n```\n\n```\nplain\n```";
        let stats = compute_stats(text);
        assert_eq!(stats.code_blocks, 3);
        assert_eq!(stats.diagram_blocks, 1);
    }

    #[test]
    fn test_tilde_fences_counted_as_code_blocks() {
        let text = "~~~\nplain\n~~~\n\n~~~~md\n```mermaid\ngraph\n```\n~~~~";
        let stats = compute_stats(text);
        assert_eq!(stats.code_blocks, 2);
        assert_eq!(stats.diagram_blocks, 0);
    }

    #[test]
    fn test_read_time_rounds_down() {
        let text = "word ".repeat(399);
        assert_eq!(compute_stats(&text).read_time_minutes, 1);
        let text = "word ".repeat(400);
        assert_eq!(compute_stats(&text).read_time_minutes, 2);
    }

    #[test]
    fn test_goal_progress() {
        let stats = compute_stats("one two three four");
        assert_eq!(stats.goal_progress(0), None);
        assert_eq!(stats.goal_progress(8), Some(0.5));
    }

    #[test]
    fn test_format_compact() {
        let stats = compute_stats("Hello World\nLine 2");
        assert_eq!(stats.format_compact(), "4 words | 18 chars | 2 lines");
    }
}
