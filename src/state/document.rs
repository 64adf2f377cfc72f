//! The edited document
//!
//! Holds the buffer, where it lives on disk, the cursor and the undo
//! history. Dirtiness is derived by comparing against the last text that
//! was loaded or saved, so editing back to that text clears it.

use crate::string_utils::floor_char_boundary;
use std::path::{Path, PathBuf};

/// Maximum undo history size
const MAX_UNDO: usize = 100;

/// Display name of a buffer that was never saved.
pub const UNTITLED: &str = "Untitled";

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Document {
    text: String,
    /// Text as last loaded or saved
    saved_text: String,
    path: Option<PathBuf>,
    /// Cursor as a byte offset into `text`
    cursor: usize,
    /// Selection as (start, end) byte offsets
    selection: Option<(usize, usize)>,
    undo_stack: Vec<String>,
    redo_stack: Vec<String>,
}

impl Document {
    /// An empty, unsaved buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clean document loaded from `path`.
    pub fn with_file(path: PathBuf, text: String) -> Self {
        Self {
            saved_text: text.clone(),
            text,
            path: Some(path),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True when the text differs from the last loaded or saved version.
    pub fn is_dirty(&self) -> bool {
        self.text != self.saved_text
    }

    /// File name for display, or [`UNTITLED`].
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// Replace the text, recording the old text for undo.
    ///
    /// Returns false when the text is unchanged.
    pub fn set_text(&mut self, text: String) -> bool {
        if text == self.text {
            return false;
        }
        let old = std::mem::replace(&mut self.text, text);
        self.undo_stack.push(old);
        if self.undo_stack.len() > MAX_UNDO {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
        self.clamp_cursor();
        true
    }

    /// Record the current text as persisted at `path`.
    pub fn mark_saved(&mut self, path: PathBuf) {
        self.saved_text = self.text.clone();
        self.path = Some(path);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cursor
    // ─────────────────────────────────────────────────────────────────────────

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor, snapping to a character boundary. Clears the selection.
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = floor_char_boundary(&self.text, offset);
        self.selection = None;
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// Select from `anchor` to `head`; the cursor moves to `head`.
    ///
    /// The stored range is ordered, so a right-to-left drag gives the same
    /// selection as a left-to-right one. Empty selections clear it.
    pub fn set_selection(&mut self, anchor: usize, head: usize) {
        let anchor = floor_char_boundary(&self.text, anchor);
        let head = floor_char_boundary(&self.text, head);
        self.cursor = head;
        self.selection = (anchor != head).then_some((anchor.min(head), anchor.max(head)));
    }

    fn clamp_cursor(&mut self) {
        self.cursor = floor_char_boundary(&self.text, self.cursor);
        if let Some((start, end)) = self.selection {
            let start = floor_char_boundary(&self.text, start);
            let end = floor_char_boundary(&self.text, end);
            self.selection = (start != end).then_some((start, end));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Undo / Redo
    // ─────────────────────────────────────────────────────────────────────────

    /// Undo the last edit. Returns `true` if undo was performed.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                let current = std::mem::replace(&mut self.text, previous);
                self.redo_stack.push(current);
                self.clamp_cursor();
                true
            }
            None => false,
        }
    }

    /// Redo the last undone edit. Returns `true` if redo was performed.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                let current = std::mem::replace(&mut self.text, next);
                self.undo_stack.push(current);
                self.clamp_cursor();
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
