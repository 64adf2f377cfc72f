//! Markup completion list
//!
//! Fixed markdown fragments offered while typing at the start of a line.
//! The typed prefix is matched case-insensitively against the start of each
//! item.

const COMPLETIONS: &[&str] = &[
    // Headings
    "# ",
    "## ",
    "### ",
    "#### ",
    "##### ",
    "###### ",
    // Emphasis
    "**bold**",
    "*italic*",
    "~~strikethrough~~",
    "`inline code`",
    // Links and images
    "[link text](url)",
    "![image description](url)",
    // Lists
    "- ",
    "1. ",
    "- [ ] ",
    "- [x] ",
    // Code blocks
    "```\ncode\n```",
    "```python\n\n```",
    "```javascript\n\n```",
    "```bash\n\n```",
    "```json\n\n```",
    // Quotes
    "> ",
    ">> ",
    // Rules
    "---",
    "***",
    // Tables
    "| Header 1 | Header 2 |\n|----------|----------|\n| Cell 1 | Cell 2 |",
    // Other
    "<!-- comment -->",
    "[^footnote]",
];

/// Every completion item, in menu order.
pub fn completion_items() -> &'static [&'static str] {
    COMPLETIONS
}

/// Items that extend `prefix`, in menu order.
///
/// An empty prefix offers nothing, and an item equal to the prefix is not
/// offered again.
pub fn complete(prefix: &str) -> Vec<&'static str> {
    if prefix.is_empty() {
        return Vec::new();
    }
    let prefix = prefix.to_lowercase();
    COMPLETIONS
        .iter()
        .copied()
        .filter(|item| item.len() > prefix.len() && item.to_lowercase().starts_with(&prefix))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
