//! Editor-side text services
//!
//! Everything derived from or applied to the raw document text: statistics,
//! the heading outline, find & replace, formatting helpers, snippets,
//! completions, the emoji palette and starter templates. All of it is pure
//! text in, text out; the session decides when to run it.

pub mod completion;
pub mod emoji;
pub mod find_replace;
pub mod formatting;
pub mod outline;
pub mod snippets;
pub mod stats;
pub mod templates;

pub use completion::{complete, completion_items};
pub use emoji::{emoji_categories, EmojiCategory};
pub use find_replace::FindState;
pub use formatting::FormatResult;
pub use outline::{extract_outline, Outline, OutlineNode};
pub use snippets::SnippetLibrary;
pub use stats::{compute_stats, Statistics};
pub use templates::{find_template, templates, Template};
