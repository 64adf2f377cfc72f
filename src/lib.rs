//! mdpro - document core of a markdown editor
//!
//! The crate owns the edited text and everything derived from it: word
//! statistics, the heading outline, fenced diagram blocks and a themed
//! HTML preview. A GUI shell (or the bundled CLI) drives it through
//! [`state::Session`].

pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod markdown;
pub mod preview;
pub mod state;
pub mod string_utils;
pub mod theme;

pub use error::{Error, Result};
pub use state::{Command, Session};
