//! Live preview
//!
//! The renderer produces a complete HTML document; a [`PreviewSurface`]
//! (an embedded web view in a GUI, or [`HeadlessSurface`] elsewhere)
//! displays it and runs the one-way script calls used for diagram zoom and
//! export.

pub mod diagram;
mod renderer;
pub mod shell;

pub use diagram::{DiagramController, ExportFormat};
pub use renderer::{PreviewRenderer, RenderOutput};

// ─────────────────────────────────────────────────────────────────────────────
// Surface
// ─────────────────────────────────────────────────────────────────────────────

/// The HTML-rendering surface the preview is shown on.
///
/// Results of export requests come back through
/// [`crate::state::Session::on_svg_ready`] and
/// [`crate::state::Session::on_png_ready`].
pub trait PreviewSurface {
    /// Replace the displayed document.
    fn set_html(&mut self, html: &str);

    /// Run a script in the displayed document without waiting for a result.
    fn run_script(&mut self, script: &str);
}

/// A surface that only records what it was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessSurface {
    /// Last document set
    pub html: Option<String>,
    /// Number of `set_html` calls
    pub loads: usize,
    /// Scripts run, in order
    pub scripts: Vec<String>,
}

impl PreviewSurface for HeadlessSurface {
    fn set_html(&mut self, html: &str) {
        self.html = Some(html.to_string());
        self.loads += 1;
    }

    fn run_script(&mut self, script: &str) {
        self.scripts.push(script.to_string());
    }
}
