//! User settings and preferences for mdpro
//!
//! This module defines the `Settings` struct that holds the persisted
//! preferences of the editor core, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Theme Mode
// ─────────────────────────────────────────────────────────────────────────────

/// The two preview themes. There are no intermediate themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Map the persisted `dark_mode` flag to a theme.
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    /// Flip between light and dark.
    pub fn toggle(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, ThemeMode::Dark)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences persisted between sessions.
///
/// `#[serde(default)]` lets files written by older versions (or edited by
/// hand) load with defaults for whatever keys they lack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Whether the preview uses the dark palette
    pub dark_mode: bool,

    /// syntect theme used for code blocks in light mode
    pub syntax_theme_light: String,

    /// syntect theme used for code blocks in dark mode
    pub syntax_theme_dark: String,

    // ─────────────────────────────────────────────────────────────────────────
    // Writing
    // ─────────────────────────────────────────────────────────────────────────
    /// Target word count (0 = disabled)
    pub word_goal: u32,

    /// Delay between the last keystroke and the preview refresh
    pub preview_debounce_ms: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // Auto-save
    // ─────────────────────────────────────────────────────────────────────────
    /// Whether dirty documents with a path are saved periodically
    pub auto_save: bool,

    /// Auto-save interval in seconds
    pub auto_save_interval_secs: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────
    /// Recently opened files (most recent first)
    pub recent_files: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            syntax_theme_light: String::from("InspiredGitHub"),
            syntax_theme_dark: String::from("base16-ocean.dark"),
            word_goal: 0,
            preview_debounce_ms: 300,
            auto_save: true,
            auto_save_interval_secs: 60,
            recent_files: Vec::new(),
        }
    }
}

impl Settings {
    /// Maximum number of recent files to remember.
    pub const MAX_RECENT_FILES: usize = 10;
    /// Shortest accepted auto-save interval.
    pub const MIN_AUTO_SAVE_SECS: u64 = 5;
    /// Accepted range for the preview debounce.
    pub const MIN_DEBOUNCE_MS: u64 = 50;
    pub const MAX_DEBOUNCE_MS: u64 = 5000;

    /// Current preview theme.
    pub fn theme(&self) -> ThemeMode {
        ThemeMode::from_dark_mode(self.dark_mode)
    }

    /// syntect theme name for the given preview theme.
    pub fn syntax_theme(&self, theme: ThemeMode) -> &str {
        match theme {
            ThemeMode::Light => &self.syntax_theme_light,
            ThemeMode::Dark => &self.syntax_theme_dark,
        }
    }

    /// Add a file to the recent files list.
    ///
    /// If the file already exists in the list, it's moved to the front.
    /// The list is trimmed to `MAX_RECENT_FILES`.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(Self::MAX_RECENT_FILES);
    }

    /// Forget every recent file.
    pub fn clear_recent_files(&mut self) {
        self.recent_files.clear();
    }

    /// Recent files that still exist on disk, in order.
    pub fn existing_recent_files(&self) -> Vec<&Path> {
        self.recent_files
            .iter()
            .map(PathBuf::as_path)
            .filter(|p| p.exists())
            .collect()
    }

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        // Drop duplicates while keeping the first (most recent) occurrence
        let mut seen = Vec::with_capacity(self.recent_files.len());
        self.recent_files.retain(|p| {
            if seen.contains(p) {
                false
            } else {
                seen.push(p.clone());
                true
            }
        });
        self.recent_files.truncate(Self::MAX_RECENT_FILES);

        if self.auto_save_interval_secs < Self::MIN_AUTO_SAVE_SECS {
            self.auto_save_interval_secs = Self::MIN_AUTO_SAVE_SECS;
        }

        self.preview_debounce_ms = self
            .preview_debounce_ms
            .clamp(Self::MIN_DEBOUNCE_MS, Self::MAX_DEBOUNCE_MS);
    }

    /// Deserialize settings and sanitize them in one step.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
