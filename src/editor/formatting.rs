//! Markdown editing helpers
//!
//! Pure text transformations behind the insert/format commands. Each takes
//! the current text plus a cursor or selection (byte offsets) and returns
//! the new text together with where the cursor should go.
//!
//! ```ignore
//! let result = wrap_selection("Hello world", Some((0, 5)), 5, "**");
//! assert_eq!(result.text, "**Hello** world");
//! ```

use crate::string_utils::floor_char_boundary;

/// Header cell placeholder used by [`table_markdown`].
pub const TABLE_HEADER_CELL: &str = "Header";
/// Body cell placeholder used by [`table_markdown`].
pub const TABLE_BODY_CELL: &str = "Cell";
/// Link text used when none is given.
pub const DEFAULT_LINK_TEXT: &str = "link";
/// Link target used when none is given.
pub const DEFAULT_LINK_URL: &str = "#";
/// Image alt text used when none is given.
pub const DEFAULT_IMAGE_ALT: &str = "image";
/// Image source used when none is given.
pub const DEFAULT_IMAGE_URL: &str = "image.png";

// ─────────────────────────────────────────────────────────────────────────────
// Format Result
// ─────────────────────────────────────────────────────────────────────────────

/// Result of applying an editing helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    /// The new text after the edit
    pub text: String,
    /// New cursor position (byte offset)
    pub cursor: usize,
}

impl FormatResult {
    fn new(text: String, cursor: usize) -> Self {
        Self { text, cursor }
    }
}

/// Clamp a possibly reversed selection to valid character boundaries.
fn clamp_range(text: &str, start: usize, end: usize) -> (usize, usize) {
    let start = floor_char_boundary(text, start);
    let end = floor_char_boundary(text, end);
    if start > end {
        (end, start)
    } else {
        (start, end)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Insertion
// ─────────────────────────────────────────────────────────────────────────────

/// Insert `insert` at `cursor`; the cursor ends after the inserted text.
pub fn insert_text(text: &str, cursor: usize, insert: &str) -> FormatResult {
    replace_range(text, (cursor, cursor), insert)
}

/// Replace the `(start, end)` range with `insert`; the cursor ends after it.
pub fn replace_range(text: &str, range: (usize, usize), insert: &str) -> FormatResult {
    let (start, end) = clamp_range(text, range.0, range.1);
    let mut new_text = String::with_capacity(text.len() + insert.len());
    new_text.push_str(&text[..start]);
    new_text.push_str(insert);
    new_text.push_str(&text[end..]);
    FormatResult::new(new_text, start + insert.len())
}

/// Insert `prefix` at the start of the line containing `cursor`.
///
/// The cursor keeps its place in the line, shifted by the prefix.
pub fn insert_at_line_start(text: &str, cursor: usize, prefix: &str) -> FormatResult {
    let cursor = floor_char_boundary(text, cursor);
    let line_start = text[..cursor].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let mut new_text = String::with_capacity(text.len() + prefix.len());
    new_text.push_str(&text[..line_start]);
    new_text.push_str(prefix);
    new_text.push_str(&text[line_start..]);
    FormatResult::new(new_text, cursor + prefix.len())
}

/// Line prefix for a heading of `level` (clamped to 1..=6), e.g. `"## "`.
pub fn heading_prefix(level: u8) -> String {
    format!("{} ", "#".repeat(level.clamp(1, 6) as usize))
}

/// Wrap the selection with `marker` on both sides.
///
/// With no (or an empty) selection both markers are inserted at `cursor`
/// and the cursor is placed between them.
pub fn wrap_selection(
    text: &str,
    selection: Option<(usize, usize)>,
    cursor: usize,
    marker: &str,
) -> FormatResult {
    let (start, end) = match selection {
        Some((a, b)) => clamp_range(text, a, b),
        None => {
            let c = floor_char_boundary(text, cursor);
            (c, c)
        }
    };

    let selected = &text[start..end];
    let wrapped = format!("{marker}{selected}{marker}");
    let mut result = replace_range(text, (start, end), &wrapped);
    if start == end {
        result.cursor = start + marker.len();
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Generated Markup
// ─────────────────────────────────────────────────────────────────────────────

/// Markdown table with `rows` rows and `cols` columns.
///
/// When `header` is set the first row is a header row followed by the
/// separator, so the table has `rows - 1` body rows. Dimensions below one
/// are raised to one.
pub fn table_markdown(rows: usize, cols: usize, header: bool) -> String {
    let cols = cols.max(1);
    let mut body_rows = rows.max(1);
    let row = |cell: &str| format!("| {} |", vec![cell; cols].join(" | "));

    let mut lines = Vec::with_capacity(body_rows + 1);
    if header {
        lines.push(row(TABLE_HEADER_CELL));
        lines.push(row("------"));
        body_rows -= 1;
    }
    for _ in 0..body_rows {
        lines.push(row(TABLE_BODY_CELL));
    }
    lines.join("\n")
}

/// `[text](url)`, with defaults for empty fields.
pub fn link_markdown(text: &str, url: &str) -> String {
    format!(
        "[{}]({})",
        non_empty_or(text, DEFAULT_LINK_TEXT),
        non_empty_or(url, DEFAULT_LINK_URL)
    )
}

/// `![alt](url)`, with defaults for empty fields.
pub fn image_markdown(alt: &str, url: &str) -> String {
    format!(
        "![{}]({})",
        non_empty_or(alt, DEFAULT_IMAGE_ALT),
        non_empty_or(url, DEFAULT_IMAGE_URL)
    )
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_text_at_cursor() {
        let result = insert_text("Hello world", 5, ",");
        assert_eq!(result.text, "Hello, world");
        assert_eq!(result.cursor, 6);
    }

    #[test]
    fn test_insert_text_clamps_cursor() {
        let result = insert_text("abc", 99, "!");
        assert_eq!(result.text, "abc!");
        assert_eq!(result.cursor, 4);
    }

    #[test]
    fn test_insert_inside_multibyte_char() {
        // Offset 1 is inside 'é'; insertion snaps to its start
        let result = insert_text("é", 1, "x");
        assert_eq!(result.text, "xé");
    }

    #[test]
    fn test_insert_at_line_start() {
        let text = "first\nsecond line";
        let result = insert_at_line_start(text, 10, &heading_prefix(2));
        assert_eq!(result.text, "first\n## second line");
        assert_eq!(result.cursor, 13);
    }

    #[test]
    fn test_heading_prefix_clamps_level() {
        assert_eq!(heading_prefix(0), "# ");
        assert_eq!(heading_prefix(3), "### ");
        assert_eq!(heading_prefix(9), "###### ");
    }

    #[test]
    fn test_wrap_selection() {
        let result = wrap_selection("Hello world", Some((0, 5)), 5, "**");
        assert_eq!(result.text, "**Hello** world");
        assert_eq!(result.cursor, 9);
    }

    #[test]
    fn test_wrap_reversed_selection() {
        let result = wrap_selection("Hello world", Some((11, 6)), 6, "`");
        assert_eq!(result.text, "Hello `world`");
    }

    #[test]
    fn test_wrap_without_selection_places_cursor_between() {
        let result = wrap_selection("ab", None, 1, "*");
        assert_eq!(result.text, "a**b");
        assert_eq!(result.cursor, 2);

        let result = wrap_selection("ab", Some((1, 1)), 1, "**");
        assert_eq!(result.text, "a****b");
        assert_eq!(result.cursor, 3);
    }

    #[test]
    fn test_table_with_header() {
        let table = table_markdown(3, 2, true);
        assert_eq!(
            table,
            "| Header | Header |\n| ------ | ------ |\n| Cell | Cell |\n| Cell | Cell |"
        );
    }

    #[test]
    fn test_table_without_header() {
        let table = table_markdown(2, 1, false);
        assert_eq!(table, "| Cell |\n| Cell |");
    }

    #[test]
    fn test_table_minimum_size() {
        assert_eq!(table_markdown(0, 0, false), "| Cell |");
        assert_eq!(table_markdown(1, 1, true), "| Header |\n| ------ |");
    }

    #[test]
    fn test_link_and_image_defaults() {
        assert_eq!(link_markdown("", ""), "[link](#)");
        assert_eq!(link_markdown("Rust", "https://rust-lang.org"), "[Rust](https://rust-lang.org)");
        assert_eq!(image_markdown(" ", ""), "![image](image.png)");
        assert_eq!(image_markdown("logo", "logo.svg"), "![logo](logo.svg)");
    }
}
