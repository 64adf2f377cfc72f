//! UTF-8 safe cursor arithmetic and small text helpers
//!
//! Cursor and selection positions handed to the session are byte offsets
//! into the document text. A caller (a widget, a test, the outline) may
//! hand us an offset that lands inside a multi-byte character or past the
//! end of the text, so every position is clamped here before slicing.

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than the string length, returns the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let bytes = s.as_bytes();
    let mut i = index;
    while i > 0 && !is_utf8_char_start(bytes[i]) {
        i -= 1;
    }
    i
}

#[inline]
fn is_utf8_char_start(byte: u8) -> bool {
    // Continuation bytes look like 10xxxxxx
    (byte & 0b1100_0000) != 0b1000_0000
}

// ─────────────────────────────────────────────────────────────────────────────
// Line / Offset Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Byte offset of the first character of `line` (0-based).
///
/// Lines past the end of the text map to `text.len()`.
pub fn line_start_offset(text: &str, line: usize) -> usize {
    if line == 0 {
        return 0;
    }
    text.match_indices('\n')
        .nth(line - 1)
        .map(|(i, _)| i + 1)
        .unwrap_or(text.len())
}

/// Convert a byte offset into a 0-based (line, column) pair.
///
/// The column counts characters, not bytes.
pub fn offset_to_line_col(text: &str, offset: usize) -> (usize, usize) {
    let offset = floor_char_boundary(text, offset);
    let before = &text[..offset];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    (line, before[line_start..].chars().count())
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML
// ─────────────────────────────────────────────────────────────────────────────

/// HTML-escape a string.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
