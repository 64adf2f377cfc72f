//! Session state
//!
//! The [`Session`] owns the single open [`Document`] plus the settings
//! store, snippet library, renderer and timers. A UI drives it with
//! [`Command`]s (or the matching methods) and `tick(now)` calls.

mod commands;
mod document;
mod session;
mod timers;

pub use commands::{Command, DirtyChoice, Dispatch, Notification, Outcome, PendingAction};
pub use document::Document;
pub use session::{Session, APP_TITLE};
pub use timers::{Debouncer, IntervalTimer};
