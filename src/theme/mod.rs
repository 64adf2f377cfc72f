//! Preview palettes
//!
//! The preview has exactly two palettes, picked by a light/dark switch.
//! Each palette carries the handful of colours the HTML shell needs and
//! the theme name handed to the diagram library.
//!
//! ```ignore
//! use crate::config::ThemeMode;
//! use crate::theme::PreviewPalette;
//!
//! let palette = PreviewPalette::for_mode(ThemeMode::Dark);
//! let css = palette.to_css();
//! ```

use crate::config::ThemeMode;

// ─────────────────────────────────────────────────────────────────────────────
// Preview Palette
// ─────────────────────────────────────────────────────────────────────────────

/// Colours used by the rendered preview document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewPalette {
    pub mode: ThemeMode,
    pub background: &'static str,
    pub text: &'static str,
    pub code_background: &'static str,
    pub link: &'static str,
    pub quote_border: &'static str,
    /// Border colour for tables and heading rules
    pub border: &'static str,
    /// Theme name passed to `mermaid.initialize`
    pub diagram_theme: &'static str,
}

impl PreviewPalette {
    /// Get the light palette.
    pub const fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            background: "#ffffff",
            text: "#333333",
            code_background: "#f5f5f5",
            link: "#0066cc",
            quote_border: "#0066cc",
            border: "#eeeeee",
            diagram_theme: "default",
        }
    }

    /// Get the dark palette.
    pub const fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            background: "#1e1e1e",
            text: "#d4d4d4",
            code_background: "#2d2d2d",
            link: "#4ec9b0",
            quote_border: "#4ec9b0",
            border: "#404040",
            diagram_theme: "dark",
        }
    }

    pub const fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.mode.is_dark()
    }

    /// Theme-specific CSS rules, layered over the base stylesheet.
    pub fn to_css(&self) -> String {
        format!(
            r#":root {{
    color-scheme: {color_scheme};
}}

body {{
    background-color: {bg};
    color: {text};
}}

h1, h2 {{
    border-bottom-color: {border};
}}

a {{
    color: {link};
}}

code, pre {{
    background-color: {code_bg};
}}

blockquote {{
    border-left-color: {quote};
}}

th, td {{
    border-color: {border};
}}"#,
            color_scheme = if self.is_dark() { "dark" } else { "light" },
            bg = self.background,
            text = self.text,
            border = self.border,
            link = self.link,
            code_bg = self.code_background,
            quote = self.quote_border,
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
