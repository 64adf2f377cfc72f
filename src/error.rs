//! Centralized error handling for mdpro
//!
//! One error type covers every failure the document core can report:
//! document I/O, settings and snippet persistence, and diagram export.
//! Rendering never fails (it degrades instead), so it has no variant here.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the crate.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // File I/O Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic I/O error wrapper
    Io(io::Error),

    /// Failed to read a document
    FileRead { path: PathBuf, source: io::Error },

    /// Failed to write a document or an exported artifact
    FileWrite { path: PathBuf, source: io::Error },

    /// `save()` was requested for a buffer that was never saved
    NoFilePath,

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load a settings or snippets file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save a settings or snippets file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse a settings or snippets file
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Diagram Export Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// A diagram export is already waiting for the preview surface
    ExportInProgress { pending: PathBuf },

    /// The surface delivered a result while no export was requested
    NoPendingExport,

    /// The raster payload was not a base64 `data:` URI
    InvalidDataUri(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Snippet Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Trigger is empty or contains whitespace
    InvalidSnippetTrigger(String),

    /// A snippet with this trigger already exists
    DuplicateSnippet(String),

    /// No snippet with this trigger
    SnippetNotFound(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Application Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic application error with a message
    Application(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // File I/O Errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::FileRead { path, source } => {
                write!(f, "Failed to open '{}': {}", path.display(), source)
            }
            Error::FileWrite { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }
            Error::NoFilePath => write!(f, "No file path set. Use 'Save As' instead."),

            // Configuration Errors
            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }

            // Diagram Export Errors
            Error::ExportInProgress { pending } => write!(
                f,
                "A diagram export to '{}' is still in progress",
                pending.display()
            ),
            Error::NoPendingExport => write!(f, "No diagram export was requested"),
            Error::InvalidDataUri(reason) => write!(f, "Invalid image data: {}", reason),

            // Snippet Errors
            Error::InvalidSnippetTrigger(trigger) => {
                write!(f, "'{}' is not a valid snippet trigger", trigger)
            }
            Error::DuplicateSnippet(trigger) => {
                write!(f, "A snippet named '{}' already exists", trigger)
            }
            Error::SnippetNotFound(trigger) => write!(f, "No snippet named '{}'", trigger),

            // Application Errors
            Error::Application(msg) => write!(f, "{}", msg),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::FileRead { source, .. } | Error::FileWrite { source, .. } => Some(source),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::NoFilePath
            | Error::ConfigDirNotFound
            | Error::ExportInProgress { .. }
            | Error::NoPendingExport
            | Error::InvalidDataUri(_)
            | Error::InvalidSnippetTrigger(_)
            | Error::DuplicateSnippet(_)
            | Error::SnippetNotFound(_)
            | Error::Application(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
