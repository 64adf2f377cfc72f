//! Markdown to HTML conversion using comrak
//!
//! The preview talks to the converter through [`MarkdownConverter`] so the
//! engine can be swapped (or faked in tests). [`ComrakConverter`] is the
//! default: GFM extensions, hard line breaks, heading anchors, `[TOC]`
//! markers and syntect highlighting for fenced code.

use crate::markdown::toc::{replace_toc_markers, TocEntry};
use comrak::nodes::{AstNode, NodeCode, NodeValue};
use comrak::plugins::syntect::SyntectAdapter;
use comrak::{format_html_with_plugins, parse_document, Anchorizer, Arena, Options, Plugins};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

// ─────────────────────────────────────────────────────────────────────────────
// Converter Seam
// ─────────────────────────────────────────────────────────────────────────────

/// Something that turns markdown into an HTML fragment.
pub trait MarkdownConverter {
    fn convert(&self, markdown: &str) -> Result<String, ConversionError>;
}

/// The converter could not produce HTML for its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    message: String,
}

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "converter panicked".to_string()
        };
        Self::new(message)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Conversion error: {}", self.message)
    }
}

impl std::error::Error for ConversionError {}

/// Run a conversion, turning a panic inside it into a `ConversionError`.
pub fn convert_guarded<F>(convert: F) -> Result<String, ConversionError>
where
    F: FnOnce() -> Result<String, ConversionError>,
{
    panic::catch_unwind(AssertUnwindSafe(convert)).unwrap_or_else(|payload| {
        Err(ConversionError::from_panic(payload))
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration options for markdown rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Enable footnotes
    pub footnotes: bool,
    /// Render every newline inside a paragraph as `<br>`
    pub hard_breaks: bool,
    /// Pass raw HTML through (diagram containers depend on it)
    pub raw_html: bool,
    /// Generate GitHub-style heading IDs
    pub header_ids: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            footnotes: true,
            hard_breaks: true,
            raw_html: true,
            header_ids: true,
        }
    }
}

impl ConvertOptions {
    /// Convert to comrak Options.
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.footnotes = self.footnotes;
        options.extension.header_ids = self.header_ids.then(String::new);

        options.render.hardbreaks = self.hard_breaks;
        options.render.unsafe_ = self.raw_html;

        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Comrak Converter
// ─────────────────────────────────────────────────────────────────────────────

/// Default converter backed by comrak.
pub struct ComrakConverter {
    options: Options,
    highlighter: Option<SyntectAdapter>,
}

impl ComrakConverter {
    /// Converter without syntax highlighting.
    pub fn new(options: &ConvertOptions) -> Self {
        Self {
            options: options.to_comrak_options(),
            highlighter: None,
        }
    }

    /// Converter that highlights fenced code with the named syntect theme.
    ///
    /// The name must be one of syntect's bundled themes
    /// (see [`crate::markdown::syntax::resolve_theme`]).
    pub fn with_syntax_theme(options: &ConvertOptions, theme: &str) -> Self {
        Self {
            options: options.to_comrak_options(),
            highlighter: Some(SyntectAdapter::new(Some(theme))),
        }
    }

    fn convert_unguarded(&self, markdown: &str) -> Result<String, ConversionError> {
        let arena = Arena::new();
        let root = parse_document(&arena, markdown, &self.options);
        let toc = collect_toc_entries(root);

        let mut plugins = Plugins::default();
        if let Some(adapter) = &self.highlighter {
            plugins.render.codefence_syntax_highlighter = Some(adapter);
        }

        let mut out = Vec::with_capacity(markdown.len() * 2);
        format_html_with_plugins(root, &self.options, &mut out, &plugins)
            .map_err(|e| ConversionError::new(e.to_string()))?;
        let html = String::from_utf8(out).map_err(|e| ConversionError::new(e.to_string()))?;

        Ok(replace_toc_markers(&html, &toc))
    }
}

impl Default for ComrakConverter {
    fn default() -> Self {
        Self::new(&ConvertOptions::default())
    }
}

impl MarkdownConverter for ComrakConverter {
    fn convert(&self, markdown: &str) -> Result<String, ConversionError> {
        convert_guarded(|| self.convert_unguarded(markdown))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Heading Collection
// ─────────────────────────────────────────────────────────────────────────────

/// Headings in document order, anchored exactly as the HTML renderer does.
fn collect_toc_entries<'a>(root: &'a AstNode<'a>) -> Vec<TocEntry> {
    let mut anchorizer = Anchorizer::new();
    let mut entries = Vec::new();

    for node in root.descendants() {
        let level = match node.data.borrow().value {
            NodeValue::Heading(ref heading) => heading.level,
            _ => continue,
        };
        let mut text = String::new();
        collect_text(node, &mut text);
        let anchor = anchorizer.anchorize(text.clone());
        entries.push(TocEntry {
            level,
            text,
            anchor,
        });
    }
    entries
}

fn collect_text<'a>(node: &'a AstNode<'a>, output: &mut String) {
    match node.data.borrow().value {
        NodeValue::Text(ref literal) | NodeValue::Code(NodeCode { ref literal, .. }) => {
            output.push_str(literal)
        }
        NodeValue::LineBreak | NodeValue::SoftBreak => output.push(' '),
        _ => {
            for child in node.children() {
                collect_text(child, output);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
