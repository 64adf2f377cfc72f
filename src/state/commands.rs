//! Commands and their outcomes
//!
//! A UI binds its menu items, buttons and shortcuts to [`Command`] values
//! and hands them to [`Session::dispatch`]. Errors do not escape dispatch:
//! each one becomes a single [`Notification::Error`] for the user, and the
//! returned [`Dispatch`] tells the UI whether the command acted at all.

use super::session::Session;
use crate::error::Result;
use crate::preview::PreviewSurface;
use log::{debug, warn};
use std::path::PathBuf;
use std::time::Instant;

// ─────────────────────────────────────────────────────────────────────────────
// Supporting Types
// ─────────────────────────────────────────────────────────────────────────────

/// Actions that need confirmation while the document has unsaved changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Create a new document
    NewDocument,
    /// Open a file (replacing the current document)
    Open(PathBuf),
}

/// Answer to "save changes first?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyChoice {
    Save,
    Discard,
    Cancel,
}

/// How a document-replacing request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Waiting on [`Session::resolve_pending`]
    AwaitingConfirmation,
    Cancelled,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Info(String),
    Error(String),
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Notification::Info(msg) | Notification::Error(msg) => msg,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error(_))
    }
}

/// What [`Session::dispatch`] did with a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The command ran
    Handled,
    /// The command ran but had nothing to act on (no snippet trigger before
    /// the cursor); the UI should fall back to its default key handling
    NotHandled,
    /// The command failed and an error notification was queued
    Failed,
}

impl Dispatch {
    /// True unless the command failed.
    pub fn succeeded(self) -> bool {
        self != Dispatch::Failed
    }

    pub fn is_handled(self) -> bool {
        self == Dispatch::Handled
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command
// ─────────────────────────────────────────────────────────────────────────────

/// Everything a user can ask the session to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // File
    NewDocument,
    Open(PathBuf),
    Save,
    SaveAs(PathBuf),
    ResolvePending(DirtyChoice),
    ExportHtml(PathBuf),
    ClearRecentFiles,

    // Editing
    InsertText(String),
    Heading(u8),
    WrapSelection(String),
    InsertTable { rows: usize, cols: usize, header: bool },
    InsertLink { text: String, url: String },
    InsertImage { alt: String, url: String },
    InsertEmoji(String),
    InsertCompletion(String),
    ExpandSnippet,
    ApplyTemplate(String),
    Undo,
    Redo,

    // Find & replace
    Find(String),
    FindNext,
    FindPrevious,
    ReplaceCurrent(String),
    ReplaceAll(String),

    // Navigation
    JumpToLine(usize),

    // View
    ToggleTheme,
    SetDiagramZoom(f32),
    ExportDiagramSvg { index: usize, path: PathBuf },
    ExportDiagramPng { index: usize, path: PathBuf, scale: f32 },
    DiagramSvgReady(String),
    DiagramPngReady(String),
}

/// Result of running a command, before it is reported.
enum Executed {
    Done,
    Message(String),
    Unhandled,
}

impl<S: PreviewSurface> Session<S> {
    /// Run a command, reporting the result as notifications.
    pub fn dispatch(&mut self, command: Command, now: Instant) -> Dispatch {
        debug!("Dispatching {:?}", command);
        match self.execute(command, now) {
            Ok(Executed::Message(message)) => {
                self.notify(Notification::Info(message));
                Dispatch::Handled
            }
            Ok(Executed::Done) => Dispatch::Handled,
            Ok(Executed::Unhandled) => Dispatch::NotHandled,
            Err(e) => {
                warn!("Command failed: {}", e);
                self.notify(Notification::Error(e.to_string()));
                Dispatch::Failed
            }
        }
    }

    fn execute(&mut self, command: Command, now: Instant) -> Result<Executed> {
        let executed = match command {
            Command::NewDocument => {
                self.new_document()?;
                Executed::Done
            }
            Command::Open(path) => match self.open(&path)? {
                Outcome::Completed => Executed::Message(format!("Opened {}", path.display())),
                _ => Executed::Done,
            },
            Command::Save => {
                let path = self.save()?;
                Executed::Message(format!("Saved {}", path.display()))
            }
            Command::SaveAs(path) => {
                self.save_as(&path)?;
                Executed::Message(format!("Saved {}", path.display()))
            }
            Command::ResolvePending(choice) => {
                self.resolve_pending(choice)?;
                Executed::Done
            }
            Command::ExportHtml(path) => {
                self.export_html(&path)?;
                Executed::Message(format!("Exported {}", path.display()))
            }
            Command::ClearRecentFiles => {
                self.clear_recent_files();
                Executed::Done
            }

            Command::InsertText(text) => {
                self.insert_text(&text, now);
                Executed::Done
            }
            Command::Heading(level) => {
                self.insert_heading(level, now);
                Executed::Done
            }
            Command::WrapSelection(marker) => {
                self.wrap_selection(&marker, now);
                Executed::Done
            }
            Command::InsertTable { rows, cols, header } => {
                self.insert_table(rows, cols, header, now);
                Executed::Done
            }
            Command::InsertLink { text, url } => {
                self.insert_link(&text, &url, now);
                Executed::Done
            }
            Command::InsertImage { alt, url } => {
                self.insert_image(&alt, &url, now);
                Executed::Done
            }
            Command::InsertEmoji(emoji) => {
                self.insert_emoji(&emoji, now);
                Executed::Done
            }
            Command::InsertCompletion(item) => {
                self.insert_completion(&item, now);
                Executed::Done
            }
            Command::ExpandSnippet => {
                if self.expand_snippet(now) {
                    Executed::Done
                } else {
                    Executed::Unhandled
                }
            }
            Command::ApplyTemplate(name) => {
                self.apply_template(&name, now)?;
                Executed::Done
            }
            Command::Undo => {
                self.undo(now);
                Executed::Done
            }
            Command::Redo => {
                self.redo(now);
                Executed::Done
            }

            Command::Find(term) => match self.find(&term) {
                Some(_) => Executed::Done,
                None => Executed::Message(format!("'{}' not found", term)),
            },
            Command::FindNext => {
                self.find_next();
                Executed::Done
            }
            Command::FindPrevious => {
                self.find_previous();
                Executed::Done
            }
            Command::ReplaceCurrent(replacement) => {
                self.find_state_mut().replace_term = replacement;
                self.replace_current(now);
                Executed::Done
            }
            Command::ReplaceAll(replacement) => {
                self.find_state_mut().replace_term = replacement;
                let count = self.replace_all(now);
                Executed::Message(format!("Replaced {} occurrence(s)", count))
            }

            Command::JumpToLine(line) => {
                self.jump_to_line(line);
                Executed::Done
            }

            Command::ToggleTheme => {
                self.toggle_theme(now);
                Executed::Done
            }
            Command::SetDiagramZoom(scale) => {
                self.set_diagram_zoom(scale);
                Executed::Done
            }
            Command::ExportDiagramSvg { index, path } => {
                self.export_diagram_svg(index, path)?;
                Executed::Done
            }
            Command::ExportDiagramPng { index, path, scale } => {
                self.export_diagram_png(index, path, scale)?;
                Executed::Done
            }
            Command::DiagramSvgReady(svg) => {
                let path = self.on_svg_ready(&svg)?;
                Executed::Message(format!("Exported {}", path.display()))
            }
            Command::DiagramPngReady(data_uri) => {
                let path = self.on_png_ready(&data_uri)?;
                Executed::Message(format!("Exported {}", path.display()))
            }
        };
        Ok(executed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
