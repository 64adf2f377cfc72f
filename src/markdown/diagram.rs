//! Fenced block scanning and diagram substitution
//!
//! Diagram source lives in fenced blocks whose info string is exactly
//! `mermaid`. Before the markdown converter runs, each such block is
//! swapped for a `<div class="mermaid">` container that the client-side
//! diagram library picks up after the preview is loaded. Other fenced
//! blocks are left alone so they render as ordinary code.

use crate::string_utils::html_escape;
use std::ops::Range;

/// Info string that marks a fenced block as diagram source.
pub const DIAGRAM_LANGUAGE: &str = "mermaid";

/// CSS class the diagram library looks for.
pub const DIAGRAM_CLASS: &str = "mermaid";

// ─────────────────────────────────────────────────────────────────────────────
// Fenced Blocks
// ─────────────────────────────────────────────────────────────────────────────

/// A fenced block (backticks or tildes) found in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    /// Info string after the opening fence, trimmed
    pub info: &'a str,
    /// Text between the fences, without the newline before the closing fence
    pub body: &'a str,
    /// Byte range from the start of the opening fence line to the end of the
    /// closing fence line (newline excluded)
    pub span: Range<usize>,
    /// Whether a closing fence was found before the end of the text
    pub closed: bool,
}

impl FencedBlock<'_> {
    /// Whether this block holds diagram source that can be substituted.
    pub fn is_diagram(&self) -> bool {
        self.closed && self.info == DIAGRAM_LANGUAGE
    }
}

/// Scan `text` for fenced blocks, in document order.
///
/// An opening fence is a line that starts with three or more backticks or
/// tildes. The block ends at the next line made only of the same fence
/// character (at least as many as the opening fence) or at the end of the
/// text.
pub fn fenced_blocks(text: &str) -> Vec<FencedBlock<'_>> {
    let mut blocks = Vec::new();
    let mut open: Option<OpenFence<'_>> = None;
    let mut offset = 0;

    for raw_line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += raw_line.len();
        let line = raw_line.trim_end_matches(['\n', '\r']);

        match open {
            None => {
                if let Some((marker, len)) = fence_run(line) {
                    let info = line[len..].trim();
                    // A backtick fence's info string may not contain backticks
                    if marker == b'`' && info.contains('`') {
                        continue;
                    }
                    open = Some(OpenFence {
                        start: line_start,
                        body_start: offset,
                        marker,
                        len,
                        info,
                    });
                }
            }
            Some(fence) => {
                if fence.is_closed_by(line) {
                    let body = trim_one_newline(&text[fence.body_start..line_start]);
                    blocks.push(FencedBlock {
                        info: fence.info,
                        body,
                        span: fence.start..line_start + line.len(),
                        closed: true,
                    });
                    open = None;
                }
            }
        }
    }

    if let Some(fence) = open {
        blocks.push(FencedBlock {
            info: fence.info,
            body: &text[fence.body_start.min(text.len())..],
            span: fence.start..text.len(),
            closed: false,
        });
    }

    blocks
}

/// An opening fence waiting for its closing line.
#[derive(Clone, Copy)]
struct OpenFence<'a> {
    start: usize,
    body_start: usize,
    marker: u8,
    len: usize,
    info: &'a str,
}

impl OpenFence<'_> {
    fn is_closed_by(&self, line: &str) -> bool {
        let candidate = line.trim_end();
        candidate.len() >= self.len && candidate.bytes().all(|b| b == self.marker)
    }
}

/// Fence character and run length when `line` opens a fence.
fn fence_run(line: &str) -> Option<(u8, usize)> {
    let marker = *line.as_bytes().first()?;
    if marker != b'`' && marker != b'~' {
        return None;
    }
    let len = line.bytes().take_while(|&b| b == marker).count();
    (len >= 3).then_some((marker, len))
}

fn trim_one_newline(s: &str) -> &str {
    s.strip_suffix('\n')
        .map(|s| s.strip_suffix('\r').unwrap_or(s))
        .unwrap_or(s)
}

// ─────────────────────────────────────────────────────────────────────────────
// Diagram Extraction
// ─────────────────────────────────────────────────────────────────────────────

/// One diagram found during a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    /// Verbatim body between the fences
    pub raw: String,
    /// Ordinal among the diagram blocks of the document
    pub index: usize,
    /// Container element substituted in place of the fenced block
    pub rendered_markup: String,
}

/// Result of [`extract_diagram_blocks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramExtraction {
    /// Source text with every diagram block replaced by its container
    pub text: String,
    /// Extracted diagrams in document order
    pub blocks: Vec<DiagramBlock>,
}

/// Closed diagram blocks in `text`.
pub fn find_diagram_blocks(text: &str) -> Vec<FencedBlock<'_>> {
    fenced_blocks(text)
        .into_iter()
        .filter(FencedBlock::is_diagram)
        .collect()
}

/// Build the container element for a diagram body.
///
/// The element is kept on one line so the markdown converter treats it as a
/// single raw HTML block; newlines in the body are encoded as `&#10;` and
/// come back when the browser decodes the element's text.
pub fn diagram_container(index: usize, raw: &str) -> String {
    let body = html_escape(raw).replace("\r\n", "&#10;").replace('\n', "&#10;");
    format!(
        r#"<div class="{}" id="diagram-{}">{}</div>"#,
        DIAGRAM_CLASS, index, body
    )
}

/// Replace every diagram block with its container element.
///
/// If the text has no diagram blocks the returned text equals the input.
pub fn extract_diagram_blocks(text: &str) -> DiagramExtraction {
    let found = find_diagram_blocks(text);
    if found.is_empty() {
        return DiagramExtraction {
            text: text.to_string(),
            blocks: Vec::new(),
        };
    }

    let mut out = String::with_capacity(text.len() + found.len() * 64);
    let mut blocks = Vec::with_capacity(found.len());
    let mut last = 0;

    for (index, block) in found.into_iter().enumerate() {
        let markup = diagram_container(index, block.body);
        out.push_str(&text[last..block.span.start]);
        out.push_str(&markup);
        // A blank line ends the raw HTML block before the following content
        out.push('\n');
        last = block.span.end;

        blocks.push(DiagramBlock {
            raw: block.body.to_string(),
            index,
            rendered_markup: markup,
        });
    }
    out.push_str(&text[last..]);

    DiagramExtraction { text: out, blocks }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Fence Scanning Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_fenced_blocks_basic() {
        let text = "intro\n```rust\nfn main() {}\n```\nafter";
        let blocks = fenced_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].info, "rust");
        assert_eq!(blocks[0].body, "fn main() {}");
        assert!(blocks[0].closed);
        assert_eq!(&text[blocks[0].span.clone()], "```rust\nfn main() {}\n```");
    }

    #[test]
    fn test_fence_with_info_string_does_not_close() {
        let text = "```\n```mermaid\n```";
        let blocks = fenced_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].info, "");
        assert_eq!(blocks[0].body, "```mermaid");
    }

    #[test]
    fn test_longer_fence_needs_longer_close() {
        let text = "````md\n```\ninner\n```\n````";
        let blocks = fenced_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].body, "```\ninner\n```");
    }

    #[test]
    fn test_tilde_fence() {
        let text = "~~~python\nprint(1)\n~~~\n";
        let blocks = fenced_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].info, "python");
        assert_eq!(blocks[0].body, "print(1)");
        assert!(blocks[0].closed);
    }

    #[test]
    fn test_fence_closes_only_on_same_character() {
        let blocks = fenced_blocks("~~~\n```\nstill inside\n~~~");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].body, "```\nstill inside");

        let blocks = fenced_blocks("```\n~~~\n```");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].body, "~~~");
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let blocks = fenced_blocks("```mermaid\ngraph LR\n");
        assert_eq!(blocks.len(), 1);
        assert!(!blocks[0].closed);
        assert!(!blocks[0].is_diagram());
    }

    #[test]
    fn test_empty_body() {
        let blocks = fenced_blocks("```mermaid\n```");
        assert_eq!(blocks[0].body, "");
        assert!(blocks[0].is_diagram());
    }

    #[test]
    fn test_crlf_line_endings() {
        let blocks = fenced_blocks("```mermaid\r\ngraph TD\r\n```\r\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].info, "mermaid");
        assert_eq!(blocks[0].body, "graph TD");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Extraction Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_no_diagrams_is_identity() {
        let samples = [
            "",
            "# Title\n\nJust text.",
            "```rust\nlet x = 1;\n```",
            "```mermaidx\ngraph\n```",
            "```mermaid\nnever closed",
        ];
        for text in samples {
            let extraction = extract_diagram_blocks(text);
            assert_eq!(extraction.text, text);
            assert!(extraction.blocks.is_empty());
        }
    }

    #[test]
    fn test_diagram_sample_inside_tilde_fence_is_untouched() {
        let text = "~~~markdown\n```mermaid\ngraph TD\n A-->B\n```\n~~~\n";
        let extraction = extract_diagram_blocks(text);
        assert_eq!(extraction.text, text);
        assert!(extraction.blocks.is_empty());
    }

    #[test]
    fn test_tilde_diagram_is_extracted() {
        let extraction = extract_diagram_blocks("~~~mermaid\ngraph TD\n~~~");
        assert_eq!(extraction.blocks.len(), 1);
        assert_eq!(extraction.blocks[0].raw, "graph TD");
    }

    #[test]
    fn test_single_diagram_scenario() {
        let text = "Before\n\n```mermaid\nflowchart TD\n A-->B\n```\n\nAfter";
        let extraction = extract_diagram_blocks(text);

        assert_eq!(extraction.blocks.len(), 1);
        let block = &extraction.blocks[0];
        assert_eq!(block.raw, "flowchart TD\n A-->B");
        assert_eq!(block.index, 0);

        assert_eq!(extraction.text.matches("class=\"mermaid\"").count(), 1);
        assert!(extraction.text.contains(&block.rendered_markup));
        assert!(!extraction.text.contains("```"));
        assert!(extraction.text.starts_with("Before\n\n<div"));
        assert!(extraction.text.ends_with("\n\nAfter"));
    }

    #[test]
    fn test_container_escapes_body() {
        let markup = diagram_container(3, "A-->B\nB<C");
        assert_eq!(
            markup,
            r#"<div class="mermaid" id="diagram-3">A--&gt;B&#10;B&lt;C</div>"#
        );
        assert!(!markup.contains('\n'));
    }

    #[test]
    fn test_multiple_diagrams_indexed_in_order() {
        let text = "```mermaid\ngraph A\n```\n```python\nprint(1)\n```\n```mermaid\ngraph B\n```";
        let extraction = extract_diagram_blocks(text);
        assert_eq!(extraction.blocks.len(), 2);
        assert_eq!(extraction.blocks[0].raw, "graph A");
        assert_eq!(extraction.blocks[1].raw, "graph B");
        assert_eq!(extraction.blocks[1].index, 1);
        assert!(extraction.text.contains("id=\"diagram-1\""));
        // The ordinary code block is untouched
        assert!(extraction.text.contains("```python\nprint(1)\n```"));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = "```mermaid\nsequenceDiagram\n A->>B: hi\n```";
        assert_eq!(extract_diagram_blocks(text), extract_diagram_blocks(text));
    }
}
