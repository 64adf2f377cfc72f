//! HTML export
//!
//! Writes the same themed document the preview shows, as a standalone
//! file. The `<title>` comes from the document's file stem.

use crate::config::ThemeMode;
use crate::error::{Error, Result};
use crate::preview::{PreviewRenderer, RenderOutput};
use log::info;
use std::fs;
use std::path::Path;

/// Title used for documents that were never saved.
pub const UNTITLED: &str = "Untitled";

/// Title for an exported document: the file stem, or [`UNTITLED`].
pub fn export_title(document_path: Option<&Path>) -> String {
    document_path
        .and_then(|p| p.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Render `text` and write the full document to `output`.
///
/// Returns what was rendered. A degraded render is written as well; it
/// shows the escaped source text.
pub fn export_html(
    renderer: &PreviewRenderer,
    text: &str,
    mode: ThemeMode,
    document_path: Option<&Path>,
    output: &Path,
) -> Result<RenderOutput> {
    let title = export_title(document_path);
    let rendered = renderer.render_titled(text, mode, Some(&title));

    fs::write(output, &rendered.html).map_err(|e| Error::FileWrite {
        path: output.to_path_buf(),
        source: e,
    })?;

    info!("Exported HTML to {}", output.display());
    Ok(rendered)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_export_title() {
        assert_eq!(export_title(Some(Path::new("/notes/plan.md"))), "plan");
        assert_eq!(export_title(None), "Untitled");
    }

    #[test]
    fn test_export_writes_themed_document() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("report.html");
        let doc = PathBuf::from("/notes/report.md");

        let rendered = export_html(
            &PreviewRenderer::default(),
            "# Report\n\n```mermaid\ngraph LR\n A-->B\n```",
            ThemeMode::Dark,
            Some(&doc),
            &out,
        )
        .unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert_eq!(written, rendered.html);
        assert!(written.contains("<title>report</title>"));
        assert!(written.contains("#1e1e1e"));
        assert!(written.contains("id=\"diagram-0\""));
    }

    #[test]
    fn test_export_matches_preview() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("a.html");
        let renderer = PreviewRenderer::default();
        let text = "Some *text*";

        let exported = export_html(&renderer, text, ThemeMode::Light, None, &out).unwrap();
        let preview = renderer.render_titled(text, ThemeMode::Light, Some("Untitled"));
        assert_eq!(exported, preview);
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("missing").join("a.html");
        let result = export_html(&PreviewRenderer::default(), "x", ThemeMode::Light, None, &out);
        assert!(matches!(result, Err(Error::FileWrite { .. })));
    }
}
