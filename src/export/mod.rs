//! Document export
//!
//! - `html.rs` - standalone themed HTML, identical to the preview document
//!
//! Diagram export (SVG / PNG) goes through the preview surface and lives in
//! [`crate::preview::diagram`].

pub mod html;

pub use html::{export_html, export_title};
