//! Document session
//!
//! Owns the document and everything derived from it: statistics, outline
//! and the rendered preview. Text changes only arm the debounce timer;
//! derived state is recomputed when [`Session::tick`] sees the timer fire.
//! The session never sleeps or spawns threads. Time comes in as `Instant`
//! arguments.

use super::commands::{DirtyChoice, Notification, Outcome, PendingAction};
use super::document::Document;
use super::timers::{Debouncer, IntervalTimer};
use crate::config::{Settings, SettingsStore, ThemeMode};
use crate::editor::formatting::{self, FormatResult};
use crate::editor::{completion, emoji};
use crate::editor::{
    compute_stats, extract_outline, find_template, FindState, Outline, OutlineNode,
    SnippetLibrary, Statistics,
};
use crate::error::{Error, Result};
use crate::export;
use crate::preview::{
    DiagramController, HeadlessSurface, PreviewRenderer, PreviewSurface, RenderOutput,
};
use crate::string_utils::{line_start_offset, offset_to_line_col};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Application name shown in window titles.
pub const APP_TITLE: &str = "mdpro";

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

pub struct Session<S: PreviewSurface = HeadlessSurface> {
    document: Document,
    store: SettingsStore,
    snippets: SnippetLibrary,
    renderer: PreviewRenderer,
    surface: S,
    diagrams: DiagramController,
    find: FindState,
    debounce: Debouncer,
    auto_save: IntervalTimer,
    stats: Statistics,
    outline: Outline,
    preview: RenderOutput,
    /// Number of times derived state was recomputed
    recompute_count: u64,
    pending: Option<PendingAction>,
    notifications: Vec<Notification>,
}

impl Session<HeadlessSurface> {
    /// Session rendering into a [`HeadlessSurface`].
    pub fn headless(store: SettingsStore, snippets: SnippetLibrary, now: Instant) -> Self {
        Self::new(store, snippets, HeadlessSurface::default(), now)
    }
}

impl<S: PreviewSurface> Session<S> {
    /// Create a session with an empty document and render it once.
    pub fn new(store: SettingsStore, snippets: SnippetLibrary, surface: S, now: Instant) -> Self {
        let settings = store.settings();
        let renderer = PreviewRenderer::from_settings(settings);
        let debounce = Debouncer::new(Duration::from_millis(settings.preview_debounce_ms));
        let mut auto_save =
            IntervalTimer::new(Duration::from_secs(settings.auto_save_interval_secs));
        if settings.auto_save {
            auto_save.start(now);
        }

        let mut session = Self {
            document: Document::new(),
            store,
            snippets,
            renderer,
            surface,
            diagrams: DiagramController::new(),
            find: FindState::new(),
            debounce,
            auto_save,
            stats: Statistics::default(),
            outline: Outline::default(),
            preview: RenderOutput::default(),
            recompute_count: 0,
            pending: None,
            notifications: Vec::new(),
        };
        session.recompute();
        session
    }

    /// Session whose settings and snippets live in the platform config directory.
    pub fn from_config_dir(surface: S, now: Instant) -> Result<Self> {
        let store = SettingsStore::open(SettingsStore::default_location()?);
        let snippets = SnippetLibrary::load(store.snippets_path());
        Ok(Self::new(store, snippets, surface, now))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn text(&self) -> &str {
        self.document.text()
    }

    pub fn is_dirty(&self) -> bool {
        self.document.is_dirty()
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Fraction of the word goal reached, `None` when no goal is set.
    pub fn goal_progress(&self) -> Option<f32> {
        self.stats.goal_progress(self.store.settings().word_goal)
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// The document last handed to the surface.
    pub fn preview(&self) -> &RenderOutput {
        &self.preview
    }

    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn settings(&self) -> &Settings {
        self.store.settings()
    }

    pub fn snippets(&self) -> &SnippetLibrary {
        &self.snippets
    }

    pub fn pending_action(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Whether a text change is waiting for the debounce to fire.
    pub fn is_refresh_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Window title: `"*name - mdpro"` when dirty, `"name - mdpro"` otherwise.
    pub fn title(&self) -> String {
        let name = self.document.display_name();
        if self.document.is_dirty() {
            format!("*{} - {}", name, APP_TITLE)
        } else {
            format!("{} - {}", name, APP_TITLE)
        }
    }

    /// Cursor position as 1-based (line, column) for display.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let (line, col) = offset_to_line_col(self.document.text(), self.document.cursor());
        (line + 1, col + 1)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────────────────────

    pub(super) fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Drain the messages meant for the user.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing and Timers
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the document text and re-arm the debounce.
    ///
    /// Returns false when the text did not change.
    pub fn edit(&mut self, text: impl Into<String>, now: Instant) -> bool {
        let changed = self.document.set_text(text.into());
        if changed {
            self.debounce.arm(now);
        }
        changed
    }

    pub fn set_cursor(&mut self, offset: usize) {
        self.document.set_cursor(offset);
    }

    pub fn set_selection(&mut self, start: usize, end: usize) {
        self.document.set_selection(start, end);
    }

    /// Advance the timers to `now`.
    ///
    /// Returns true when derived state was recomputed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let refreshed = self.debounce.fire_if_due(now);
        if refreshed {
            self.recompute();
        }
        if self.auto_save.fire_if_due(now) {
            self.run_auto_save();
        }
        refreshed
    }

    /// Recompute statistics, outline and preview right away.
    pub fn refresh(&mut self) {
        self.debounce.cancel();
        self.recompute();
    }

    fn recompute(&mut self) {
        let text = self.document.text();
        self.stats = compute_stats(text);
        self.outline = extract_outline(text);
        self.preview = self.renderer.render(text, self.store.settings().theme());
        self.surface.set_html(&self.preview.html);
        self.diagrams.reapply_zoom(&mut self.surface);
        self.recompute_count += 1;
        debug!(
            "Recomputed derived state ({} words, {} headings, {} diagrams)",
            self.stats.words,
            self.outline.heading_count(),
            self.preview.diagrams.len()
        );
    }

    fn run_auto_save(&mut self) {
        if self.document.path().is_none() || !self.document.is_dirty() {
            return;
        }
        match self.save() {
            Ok(path) => debug!("Auto-saved {}", path.display()),
            Err(e) => {
                warn!("Auto-save failed: {}", e);
                self.notify(Notification::Error(format!("Auto-save failed: {}", e)));
            }
        }
    }

    fn apply(&mut self, result: FormatResult, now: Instant) {
        self.edit(result.text, now);
        self.document.set_cursor(result.cursor);
    }

    /// The selection, or an empty range at the cursor.
    fn selection_or_cursor(&self) -> (usize, usize) {
        let cursor = self.document.cursor();
        self.document.selection().unwrap_or((cursor, cursor))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert text over the selection (or at the cursor).
    pub fn insert_text(&mut self, insert: &str, now: Instant) {
        let result =
            formatting::replace_range(self.document.text(), self.selection_or_cursor(), insert);
        self.apply(result, now);
    }

    /// Insert `prefix` at the start of the cursor's line.
    pub fn insert_at_line_start(&mut self, prefix: &str, now: Instant) {
        let result =
            formatting::insert_at_line_start(self.document.text(), self.document.cursor(), prefix);
        self.apply(result, now);
    }

    /// Turn the cursor's line into a heading of `level`.
    pub fn insert_heading(&mut self, level: u8, now: Instant) {
        self.insert_at_line_start(&formatting::heading_prefix(level), now);
    }

    /// Wrap the selection with `marker` (`**`, `*`, `` ` ``, ...).
    pub fn wrap_selection(&mut self, marker: &str, now: Instant) {
        let result = formatting::wrap_selection(
            self.document.text(),
            self.document.selection(),
            self.document.cursor(),
            marker,
        );
        self.apply(result, now);
    }

    /// Insert a `rows` × `cols` table on its own lines.
    pub fn insert_table(&mut self, rows: usize, cols: usize, header: bool, now: Instant) {
        let table = formatting::table_markdown(rows, cols, header);
        self.insert_text(&format!("\n{}\n", table), now);
    }

    /// Insert a link; an empty `text` uses the selected text.
    pub fn insert_link(&mut self, text: &str, url: &str, now: Instant) {
        let (start, end) = self.selection_or_cursor();
        let label = if text.is_empty() {
            self.document.text().get(start..end).unwrap_or_default().to_string()
        } else {
            text.to_string()
        };
        let markup = formatting::link_markdown(&label, url);
        self.insert_text(&markup, now);
    }

    pub fn insert_image(&mut self, alt: &str, url: &str, now: Instant) {
        let markup = formatting::image_markdown(alt, url);
        self.insert_text(&markup, now);
    }

    /// Insert an emoji chosen from the picker.
    pub fn insert_emoji(&mut self, emoji: &str, now: Instant) {
        if !emoji::is_known_emoji(emoji) {
            debug!("Inserting emoji '{}' from outside the palette", emoji);
        }
        self.insert_text(emoji, now);
    }

    /// The cursor's line up to the cursor, leading whitespace skipped, with
    /// its start offset.
    fn completion_prefix(&self) -> (usize, &str) {
        let text = self.document.text();
        let cursor = self.document.cursor();
        let line_start = text[..cursor].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let typed = text[line_start..cursor].trim_start();
        (cursor - typed.len(), typed)
    }

    /// Completion items for what has been typed on the cursor's line.
    pub fn completions(&self) -> Vec<&'static str> {
        completion::complete(self.completion_prefix().1)
    }

    /// Replace the typed prefix with a completion item.
    pub fn insert_completion(&mut self, item: &str, now: Instant) {
        let (start, _) = self.completion_prefix();
        let result =
            formatting::replace_range(self.document.text(), (start, self.document.cursor()), item);
        self.apply(result, now);
    }

    /// Expand the snippet trigger before the cursor.
    ///
    /// Returns false (and changes nothing) when there is no trigger there.
    pub fn expand_snippet(&mut self, now: Instant) -> bool {
        match self
            .snippets
            .expand(self.document.text(), self.document.cursor())
        {
            Some(result) => {
                self.apply(result, now);
                true
            }
            None => false,
        }
    }

    /// Replace the buffer with the named template.
    pub fn apply_template(&mut self, name: &str, now: Instant) -> Result<()> {
        let template = find_template(name)
            .ok_or_else(|| Error::Application(format!("Unknown template '{}'", name)))?;
        self.edit(template.render_today(), now);
        self.document.set_cursor(0);
        debug!("Applied template '{}'", template.name);
        Ok(())
    }

    pub fn undo(&mut self, now: Instant) -> bool {
        let undone = self.document.undo();
        if undone {
            self.debounce.arm(now);
        }
        undone
    }

    pub fn redo(&mut self, now: Instant) -> bool {
        let redone = self.document.redo();
        if redone {
            self.debounce.arm(now);
        }
        redone
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Find & Replace
    // ─────────────────────────────────────────────────────────────────────────

    pub fn find_state(&self) -> &FindState {
        &self.find
    }

    /// Search options and the replacement text.
    pub fn find_state_mut(&mut self) -> &mut FindState {
        &mut self.find
    }

    /// Set the search term and select the first match from the cursor.
    pub fn find(&mut self, term: &str) -> Option<(usize, usize)> {
        self.find.search_term = term.to_string();
        self.find_next()
    }

    /// Select the next match after the selection, wrapping around.
    pub fn find_next(&mut self) -> Option<(usize, usize)> {
        self.find.find_matches(self.document.text());
        let (_, from) = self.selection_or_cursor();
        let (start, end) = self.find.select_from(from)?;
        self.document.set_selection(start, end);
        Some((start, end))
    }

    /// Select the previous match before the selection, wrapping around.
    pub fn find_previous(&mut self) -> Option<(usize, usize)> {
        self.find.find_matches(self.document.text());
        let (from, _) = self.selection_or_cursor();
        let (start, end) = self.find.select_before(from)?;
        self.document.set_selection(start, end);
        Some((start, end))
    }

    /// Replace the match at (or after) the selection.
    pub fn replace_current(&mut self, now: Instant) -> bool {
        self.find.find_matches(self.document.text());
        let (from, _) = self.selection_or_cursor();
        let Some((start, _)) = self.find.select_from(from) else {
            return false;
        };
        let Some(new_text) = self.find.replace_current(self.document.text()) else {
            return false;
        };
        let cursor = start + self.find.replace_term.len();
        self.edit(new_text, now);
        self.document.set_cursor(cursor);
        true
    }

    /// Replace every match; returns how many were replaced.
    pub fn replace_all(&mut self, now: Instant) -> usize {
        let count = self.find.find_matches(self.document.text());
        if count > 0 {
            let new_text = self.find.replace_all(self.document.text());
            self.edit(new_text, now);
            self.find.clear();
        }
        count
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Move the cursor to the start of `line` (0-based).
    pub fn jump_to_line(&mut self, line: usize) {
        let offset = line_start_offset(self.document.text(), line);
        self.document.set_cursor(offset);
    }

    /// Move the cursor to an outline node's heading.
    pub fn jump_to_heading(&mut self, node: &OutlineNode) {
        self.jump_to_line(node.source_line);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // File Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Start a new, empty document.
    ///
    /// A dirty document makes this a pending action; see [`Self::resolve_pending`].
    pub fn new_document(&mut self) -> Result<Outcome> {
        self.request(PendingAction::NewDocument)
    }

    /// Open `path`, replacing the document.
    ///
    /// A dirty document makes this a pending action. A read failure leaves
    /// the session untouched.
    pub fn open(&mut self, path: impl Into<PathBuf>) -> Result<Outcome> {
        self.request(PendingAction::Open(path.into()))
    }

    fn request(&mut self, action: PendingAction) -> Result<Outcome> {
        if self.document.is_dirty() {
            debug!("Unsaved changes, waiting for confirmation: {:?}", action);
            self.pending = Some(action);
            return Ok(Outcome::AwaitingConfirmation);
        }
        self.perform(action)?;
        Ok(Outcome::Completed)
    }

    /// Answer the unsaved-changes question for the pending action.
    ///
    /// If saving fails the action stays pending and nothing else happens.
    pub fn resolve_pending(&mut self, choice: DirtyChoice) -> Result<Outcome> {
        let action = self.pending.take().ok_or_else(|| {
            Error::Application("No action is waiting for confirmation".to_string())
        })?;

        match choice {
            DirtyChoice::Cancel => {
                debug!("Cancelled {:?}", action);
                return Ok(Outcome::Cancelled);
            }
            DirtyChoice::Save => {
                if let Err(e) = self.save() {
                    self.pending = Some(action);
                    return Err(e);
                }
            }
            DirtyChoice::Discard => debug!("Discarding unsaved changes"),
        }

        self.perform(action)?;
        Ok(Outcome::Completed)
    }

    fn perform(&mut self, action: PendingAction) -> Result<()> {
        let document = match action {
            PendingAction::NewDocument => Document::new(),
            PendingAction::Open(path) => {
                let text = fs::read_to_string(&path).map_err(|e| Error::FileRead {
                    path: path.clone(),
                    source: e,
                })?;
                info!("Opened {}", path.display());
                self.remember_recent(path.clone());
                Document::with_file(path, text)
            }
        };
        self.document = document;
        self.find.clear();
        self.refresh();
        Ok(())
    }

    /// Save to the document's path; returns that path.
    pub fn save(&mut self) -> Result<PathBuf> {
        let path = self
            .document
            .path()
            .map(Path::to_path_buf)
            .ok_or(Error::NoFilePath)?;
        self.write_to(path.clone())?;
        Ok(path)
    }

    /// Save to `path`, which becomes the document's path.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        self.write_to(path.into())
    }

    fn write_to(&mut self, path: PathBuf) -> Result<()> {
        fs::write(&path, self.document.text()).map_err(|e| Error::FileWrite {
            path: path.clone(),
            source: e,
        })?;
        info!("Saved {}", path.display());
        self.remember_recent(path.clone());
        self.document.mark_saved(path);
        Ok(())
    }

    /// Write the preview document, themed as currently shown, to `path`.
    pub fn export_html(&mut self, path: &Path) -> Result<()> {
        export::export_html(
            &self.renderer,
            self.document.text(),
            self.store.settings().theme(),
            self.document.path(),
            path,
        )?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Theme and Settings
    // ─────────────────────────────────────────────────────────────────────────

    pub fn theme(&self) -> ThemeMode {
        self.store.settings().theme()
    }

    /// Flip light/dark; the preview is re-rendered immediately.
    pub fn toggle_theme(&mut self, now: Instant) -> ThemeMode {
        let theme = self.theme().toggle();
        self.update_settings(now, |s| s.dark_mode = theme.is_dark());
        theme
    }

    /// Change settings, persist them and apply what changed.
    ///
    /// Theme changes re-render at once; timer changes take effect from `now`.
    pub fn update_settings<F>(&mut self, now: Instant, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let before = self.store.settings().clone();
        f(self.store.settings_mut());
        self.store.settings_mut().sanitize();
        self.store.save_silent();

        let after = self.store.settings().clone();
        self.debounce
            .set_delay(Duration::from_millis(after.preview_debounce_ms));

        let interval = Duration::from_secs(after.auto_save_interval_secs);
        if !after.auto_save {
            self.auto_save.stop();
        } else if !self.auto_save.is_running() || self.auto_save.interval() != interval {
            self.auto_save.set_interval(interval, now);
            self.auto_save.start(now);
        }

        let themes_changed = before.syntax_theme_light != after.syntax_theme_light
            || before.syntax_theme_dark != after.syntax_theme_dark;
        if themes_changed {
            self.renderer
                .set_syntax_themes(&after.syntax_theme_light, &after.syntax_theme_dark);
        }
        if themes_changed || before.dark_mode != after.dark_mode {
            self.refresh();
        }
    }

    pub fn set_word_goal(&mut self, goal: u32, now: Instant) {
        self.update_settings(now, |s| s.word_goal = goal);
    }

    /// Recent files that still exist, most recent first.
    pub fn recent_files(&self) -> Vec<&Path> {
        self.store.settings().existing_recent_files()
    }

    pub fn clear_recent_files(&mut self) {
        self.store.settings_mut().clear_recent_files();
        self.store.save_silent();
    }

    fn remember_recent(&mut self, path: PathBuf) {
        self.store.settings_mut().add_recent_file(path);
        self.store.save_silent();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Snippets
    // ─────────────────────────────────────────────────────────────────────────

    pub fn add_snippet(&mut self, trigger: &str, expansion: &str) -> Result<()> {
        self.snippets.add(trigger, expansion)
    }

    pub fn update_snippet(&mut self, trigger: &str, expansion: &str) -> Result<()> {
        self.snippets.update(trigger, expansion)
    }

    pub fn remove_snippet(&mut self, trigger: &str) -> Result<()> {
        self.snippets.remove(trigger)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Diagrams
    // ─────────────────────────────────────────────────────────────────────────

    pub fn diagram_zoom(&self) -> f32 {
        self.diagrams.zoom()
    }

    /// Zoom every diagram; returns the clamped scale applied.
    pub fn set_diagram_zoom(&mut self, scale: f32) -> f32 {
        self.diagrams.set_zoom(&mut self.surface, scale)
    }

    fn check_diagram(&self, index: usize) -> Result<()> {
        if index >= self.preview.diagrams.len() {
            return Err(Error::Application(format!(
                "The preview has no diagram #{}",
                index + 1
            )));
        }
        Ok(())
    }

    /// Request diagram `index` as SVG; written to `path` by [`Self::on_svg_ready`].
    pub fn export_diagram_svg(&mut self, index: usize, path: impl Into<PathBuf>) -> Result<()> {
        self.check_diagram(index)?;
        self.diagrams.export_svg(&mut self.surface, index, path)
    }

    /// Request diagram `index` as PNG; written to `path` by [`Self::on_png_ready`].
    pub fn export_diagram_png(
        &mut self,
        index: usize,
        path: impl Into<PathBuf>,
        scale: f32,
    ) -> Result<()> {
        self.check_diagram(index)?;
        self.diagrams.export_png(&mut self.surface, index, path, scale)
    }

    pub fn cancel_diagram_export(&mut self) -> Option<PathBuf> {
        self.diagrams.cancel_export()
    }

    /// Surface callback with the requested SVG markup.
    pub fn on_svg_ready(&mut self, svg: &str) -> Result<PathBuf> {
        self.diagrams.on_svg_ready(svg)
    }

    /// Surface callback with the requested PNG as a base64 `data:` URI.
    pub fn on_png_ready(&mut self, data_uri: &str) -> Result<PathBuf> {
        self.diagrams.on_png_ready(data_uri)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Shutdown
    // ─────────────────────────────────────────────────────────────────────────

    /// Flush settings and snippets to disk.
    pub fn shutdown(&mut self) -> Result<()> {
        let settings = self.store.save();
        let snippets = self.snippets.save();
        info!("Session shutdown complete");
        settings.and(snippets)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
