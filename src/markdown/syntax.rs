//! Syntax highlighting themes
//!
//! Code blocks in the preview are highlighted by syntect through comrak's
//! adapter. The adapter indexes its theme set by name, so a theme name read
//! from the settings file is checked against syntect's bundled themes
//! before it is handed over.

use crate::config::ThemeMode;
use log::{debug, warn};
use std::sync::OnceLock;
use syntect::highlighting::ThemeSet;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Default dark theme name from syntect's built-in themes
pub const DEFAULT_DARK_THEME: &str = "base16-ocean.dark";

/// Default light theme name from syntect's built-in themes
pub const DEFAULT_LIGHT_THEME: &str = "InspiredGitHub";

// ─────────────────────────────────────────────────────────────────────────────
// Theme Lookup
// ─────────────────────────────────────────────────────────────────────────────

/// syntect's bundled themes, loaded once.
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(|| {
        let set = ThemeSet::load_defaults();
        debug!("Loaded {} syntax themes", set.themes.len());
        set
    })
}

/// Names of all bundled themes, sorted.
pub fn available_themes() -> Vec<&'static str> {
    theme_set().themes.keys().map(String::as_str).collect()
}

/// Whether `name` is a bundled theme.
pub fn is_known_theme(name: &str) -> bool {
    theme_set().themes.contains_key(name)
}

/// Default theme for a preview mode.
pub fn default_theme_for(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Light => DEFAULT_LIGHT_THEME,
        ThemeMode::Dark => DEFAULT_DARK_THEME,
    }
}

/// Return `requested` if it is a bundled theme, else the mode's default.
pub fn resolve_theme<'a>(requested: &'a str, mode: ThemeMode) -> &'a str {
    if is_known_theme(requested) {
        requested
    } else {
        let fallback = default_theme_for(mode);
        warn!(
            "Syntax theme '{}' not found, using '{}'",
            requested, fallback
        );
        fallback
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
