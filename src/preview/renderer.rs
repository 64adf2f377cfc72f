//! Preview rendering pipeline
//!
//! text → diagram substitution → markdown conversion → themed shell.
//! A failing conversion never escapes: the preview falls back to the raw
//! text, escaped, inside the same shell.

use crate::config::{Settings, ThemeMode};
use crate::markdown::convert::{ComrakConverter, ConvertOptions, MarkdownConverter};
use crate::markdown::diagram::{extract_diagram_blocks, DiagramBlock};
use crate::markdown::syntax::{default_theme_for, resolve_theme};
use crate::preview::shell::build_document;
use crate::string_utils::html_escape;
use crate::theme::PreviewPalette;
use log::{debug, warn};
use std::cell::OnceCell;

// ─────────────────────────────────────────────────────────────────────────────
// Render Output
// ─────────────────────────────────────────────────────────────────────────────

/// A complete preview document and what went into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutput {
    /// Full HTML document, ready for the surface
    pub html: String,
    /// Diagrams substituted during this pass
    pub diagrams: Vec<DiagramBlock>,
    /// True when conversion failed and the raw text is shown instead
    pub degraded: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Preview Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Turns document text into a themed HTML document.
///
/// One highlighting converter per theme is built on first use and kept,
/// since loading syntect's syntax definitions is the expensive part.
pub struct PreviewRenderer {
    options: ConvertOptions,
    syntax_theme_light: String,
    syntax_theme_dark: String,
    light: OnceCell<ComrakConverter>,
    dark: OnceCell<ComrakConverter>,
    custom: Option<Box<dyn MarkdownConverter>>,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new(
            default_theme_for(ThemeMode::Light),
            default_theme_for(ThemeMode::Dark),
        )
    }
}

impl PreviewRenderer {
    /// Renderer highlighting code with the given syntect themes.
    pub fn new(syntax_theme_light: &str, syntax_theme_dark: &str) -> Self {
        Self {
            options: ConvertOptions::default(),
            syntax_theme_light: resolve_theme(syntax_theme_light, ThemeMode::Light).to_string(),
            syntax_theme_dark: resolve_theme(syntax_theme_dark, ThemeMode::Dark).to_string(),
            light: OnceCell::new(),
            dark: OnceCell::new(),
            custom: None,
        }
    }

    /// Renderer configured from the user's settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.syntax_theme_light, &settings.syntax_theme_dark)
    }

    /// Renderer that uses `converter` for both themes.
    pub fn with_converter(converter: Box<dyn MarkdownConverter>) -> Self {
        Self {
            custom: Some(converter),
            ..Self::default()
        }
    }

    /// Change the syntect themes; cached converters are rebuilt lazily.
    pub fn set_syntax_themes(&mut self, light: &str, dark: &str) {
        let light = resolve_theme(light, ThemeMode::Light).to_string();
        let dark = resolve_theme(dark, ThemeMode::Dark).to_string();
        if light != self.syntax_theme_light {
            self.syntax_theme_light = light;
            self.light = OnceCell::new();
        }
        if dark != self.syntax_theme_dark {
            self.syntax_theme_dark = dark;
            self.dark = OnceCell::new();
        }
    }

    fn converter(&self, mode: ThemeMode) -> &dyn MarkdownConverter {
        if let Some(custom) = &self.custom {
            return custom.as_ref();
        }
        let (cell, theme) = match mode {
            ThemeMode::Light => (&self.light, &self.syntax_theme_light),
            ThemeMode::Dark => (&self.dark, &self.syntax_theme_dark),
        };
        cell.get_or_init(|| {
            debug!("Building {:?} preview converter with theme '{}'", mode, theme);
            ComrakConverter::with_syntax_theme(&self.options, theme)
        })
    }

    /// Render `text` for the preview.
    pub fn render(&self, text: &str, mode: ThemeMode) -> RenderOutput {
        self.render_titled(text, mode, None)
    }

    /// Render `text` into a document with the given `<title>`.
    pub fn render_titled(&self, text: &str, mode: ThemeMode, title: Option<&str>) -> RenderOutput {
        let extraction = extract_diagram_blocks(text);

        let (body, degraded) = match self.converter(mode).convert(&extraction.text) {
            Ok(fragment) => (fragment, false),
            Err(e) => {
                warn!("Preview conversion failed, showing raw text: {}", e);
                (raw_fallback(text), true)
            }
        };

        RenderOutput {
            html: build_document(&body, title, &PreviewPalette::for_mode(mode)),
            diagrams: if degraded { Vec::new() } else { extraction.blocks },
            degraded,
        }
    }
}

/// Escaped source text shown when conversion fails.
fn raw_fallback(text: &str) -> String {
    format!("<pre class=\"raw-source\">{}</pre>", html_escape(text))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
