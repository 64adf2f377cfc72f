//! Table of contents markers
//!
//! A paragraph consisting of `[TOC]` is replaced in the rendered HTML by a
//! nested list of links to the document's headings. Heading anchors come
//! from the converter, so the links match the `id`s it emits.

use crate::string_utils::html_escape;
use std::fmt::Write;

/// Marker text that requests a table of contents.
pub const TOC_MARKER: &str = "[TOC]";

/// The marker as the converter renders it: a paragraph on its own.
const TOC_PARAGRAPH: &str = "<p>[TOC]</p>";

/// A heading as it appears in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub level: u8,
    /// Plain heading text
    pub text: String,
    /// Anchor id the heading carries in the rendered HTML
    pub anchor: String,
}

struct TocNode<'a> {
    entry: &'a TocEntry,
    children: Vec<TocNode<'a>>,
}

/// Nest entries the same way the document outline does.
fn build_tree(entries: &[TocEntry]) -> Vec<TocNode<'_>> {
    fn close_top<'a>(stack: &mut Vec<TocNode<'a>>, roots: &mut Vec<TocNode<'a>>) {
        if let Some(node) = stack.pop() {
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => roots.push(node),
            }
        }
    }

    let mut roots = Vec::new();
    let mut stack: Vec<TocNode<'_>> = Vec::new();
    for entry in entries {
        while stack.last().is_some_and(|top| top.entry.level >= entry.level) {
            close_top(&mut stack, &mut roots);
        }
        stack.push(TocNode {
            entry,
            children: Vec::new(),
        });
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }
    roots
}

fn render_list(nodes: &[TocNode<'_>], out: &mut String) {
    out.push_str("<ul>\n");
    for node in nodes {
        let _ = write!(
            out,
            "<li><a href=\"#{}\">{}</a>",
            html_escape(&node.entry.anchor),
            html_escape(&node.entry.text)
        );
        if !node.children.is_empty() {
            out.push('\n');
            render_list(&node.children, out);
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");
}

/// Render entries as a `<div class="toc">` holding nested lists.
pub fn render_toc(entries: &[TocEntry]) -> String {
    let mut out = String::from("<div class=\"toc\">\n");
    let tree = build_tree(entries);
    if !tree.is_empty() {
        render_list(&tree, &mut out);
    }
    out.push_str("</div>");
    out
}

/// Replace every `[TOC]` paragraph in `html` with the rendered table.
///
/// Returns the input unchanged when it has no marker.
pub fn replace_toc_markers(html: &str, entries: &[TocEntry]) -> String {
    if !html.contains(TOC_PARAGRAPH) {
        return html.to_string();
    }
    html.replace(TOC_PARAGRAPH, &render_toc(entries))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: u8, text: &str) -> TocEntry {
        TocEntry {
            level,
            text: text.to_string(),
            anchor: text.to_lowercase().replace(' ', "-"),
        }
    }

    #[test]
    fn test_render_nested() {
        let entries = vec![entry(1, "Intro"), entry(2, "Setup"), entry(1, "End")];
        let html = render_toc(&entries);
        assert_eq!(
            html,
            "<div class=\"toc\">\n<ul>\n\
             <li><a href=\"#intro\">Intro</a>\n<ul>\n\
             <li><a href=\"#setup\">Setup</a></li>\n</ul>\n</li>\n\
             <li><a href=\"#end\">End</a></li>\n</ul>\n</div>"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_toc(&[]), "<div class=\"toc\">\n</div>");
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render_toc(&[entry(1, "A <b> & C")]);
        assert!(html.contains("A &lt;b&gt; &amp; C"));
    }

    #[test]
    fn test_replace_markers() {
        let html = "<p>[TOC]</p>\n<h1>Intro</h1>\n";
        let replaced = replace_toc_markers(html, &[entry(1, "Intro")]);
        assert!(!replaced.contains("[TOC]"));
        assert!(replaced.starts_with("<div class=\"toc\">"));
        assert!(replaced.contains("href=\"#intro\""));
    }

    #[test]
    fn test_no_marker_is_untouched() {
        let html = "<p>Inline [TOC] mention</p>\n";
        assert_eq!(replace_toc_markers(html, &[entry(1, "x")]), html);
    }
}
