//! HTML document shell
//!
//! Wraps a rendered fragment in a complete, self-contained document: base
//! stylesheet, palette colours, the diagram library bootstrap and the small
//! script API the preview surface calls into (zoom and export).

use crate::string_utils::html_escape;
use crate::theme::PreviewPalette;

/// Where the diagram library is loaded from.
pub const MERMAID_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js";

/// Global object the surface installs to receive export results.
pub const BRIDGE_OBJECT: &str = "mdproBridge";

/// Title used when the document has none.
pub const DEFAULT_TITLE: &str = "mdpro";

// ─────────────────────────────────────────────────────────────────────────────
// Document Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Generate a complete HTML document around `body`.
///
/// The output depends only on its arguments, so identical inputs produce
/// byte-identical documents.
pub fn build_document(body: &str, title: Option<&str>, palette: &PreviewPalette) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="mdpro">
    <title>{title}</title>
    <style>
{base_css}

{theme_css}
    </style>
    <script src="{mermaid_url}"></script>
</head>
<body>
    <article class="markdown-body">
{body}
    </article>
    <script>
mermaid.initialize({{ startOnLoad: true, theme: '{diagram_theme}' }});
{diagram_api}
    </script>
</body>
</html>"#,
        title = html_escape(title.unwrap_or(DEFAULT_TITLE)),
        base_css = BASE_CSS,
        theme_css = palette.to_css(),
        mermaid_url = MERMAID_SCRIPT_URL,
        body = body,
        diagram_theme = palette.diagram_theme,
        diagram_api = DIAGRAM_API_JS.replace("{bridge}", BRIDGE_OBJECT),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Static Assets
// ─────────────────────────────────────────────────────────────────────────────

/// Base CSS for markdown rendering (layout, typography).
const BASE_CSS: &str = r#"*, *::before, *::after {
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    line-height: 1.6;
    margin: 0;
    padding: 20px;
}

.markdown-body {
    max-width: 800px;
    margin: 0 auto;
}

h1, h2, h3, h4, h5, h6 {
    margin-top: 24px;
    margin-bottom: 16px;
    font-weight: 600;
    line-height: 1.25;
}

h1 { font-size: 2em; border-bottom: 1px solid; padding-bottom: 0.3em; }
h2 { font-size: 1.5em; border-bottom: 1px solid; padding-bottom: 0.3em; }
h3 { font-size: 1.25em; }

h1 a.anchor, h2 a.anchor, h3 a.anchor,
h4 a.anchor, h5 a.anchor, h6 a.anchor {
    text-decoration: none;
}

code {
    font-family: 'Consolas', 'Monaco', monospace;
    padding: 0.2em 0.4em;
    border-radius: 3px;
}

pre {
    padding: 16px;
    overflow: auto;
    border-radius: 6px;
}

pre code {
    padding: 0;
    background: transparent;
}

blockquote {
    margin: 0 0 16px 0;
    padding: 0 1em;
    border-left: 4px solid;
}

table {
    border-collapse: collapse;
    width: 100%;
    margin-bottom: 16px;
}

th, td {
    border: 1px solid;
    padding: 6px 13px;
}

img {
    max-width: 100%;
}

.toc ul {
    list-style: none;
    padding-left: 1.2em;
}

.mermaid {
    text-align: center;
    margin: 16px 0;
}"#;

/// Functions the surface invokes with one-way script calls.
///
/// Results travel back through the bridge object installed by the surface.
const DIAGRAM_API_JS: &str = r#"function diagramSvg(index) {
    var container = document.getElementById('diagram-' + index);
    return container ? container.querySelector('svg') : null;
}

function setDiagramZoom(scale) {
    document.querySelectorAll('.mermaid').forEach(function (el) {
        el.style.transform = 'scale(' + scale + ')';
        el.style.transformOrigin = 'top center';
    });
}

function exportDiagramSvg(index) {
    var svg = diagramSvg(index);
    if (!svg || !window.{bridge}) { return; }
    window.{bridge}.svgReady(new XMLSerializer().serializeToString(svg));
}

function exportDiagramPng(index, scale) {
    var svg = diagramSvg(index);
    if (!svg || !window.{bridge}) { return; }
    var data = new XMLSerializer().serializeToString(svg);
    var box = svg.getBoundingClientRect();
    var img = new Image();
    img.onload = function () {
        var canvas = document.createElement('canvas');
        canvas.width = Math.ceil(box.width * scale);
        canvas.height = Math.ceil(box.height * scale);
        var ctx = canvas.getContext('2d');
        ctx.scale(scale, scale);
        ctx.drawImage(img, 0, 0);
        window.{bridge}.pngReady(canvas.toDataURL('image/png'));
    };
    img.src = 'data:image/svg+xml;base64,' + btoa(unescape(encodeURIComponent(data)));
}"#;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_structure() {
        let html = build_document("<p>Hi</p>", Some("Notes"), &PreviewPalette::light());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Notes</title>"));
        assert!(html.contains("<article class=\"markdown-body\">\n<p>Hi</p>\n    </article>"));
        assert!(html.contains(MERMAID_SCRIPT_URL));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_diagram_theme_follows_palette() {
        let light = build_document("", None, &PreviewPalette::light());
        let dark = build_document("", None, &PreviewPalette::dark());
        assert!(light.contains("theme: 'default'"));
        assert!(dark.contains("theme: 'dark'"));
        assert!(dark.contains("background-color: #1e1e1e"));
    }

    #[test]
    fn test_script_api_present() {
        let html = build_document("", None, &PreviewPalette::light());
        assert!(html.contains("function setDiagramZoom(scale)"));
        assert!(html.contains("function exportDiagramSvg(index)"));
        assert!(html.contains("function exportDiagramPng(index, scale)"));
        assert!(html.contains("window.mdproBridge.pngReady"));
        assert!(!html.contains("{bridge}"));
    }

    #[test]
    fn test_title_escaped_and_defaulted() {
        let html = build_document("", Some("<draft>"), &PreviewPalette::light());
        assert!(html.contains("<title>&lt;draft&gt;</title>"));
        let html = build_document("", None, &PreviewPalette::light());
        assert!(html.contains("<title>mdpro</title>"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let palette = PreviewPalette::dark();
        assert_eq!(
            build_document("<h1>x</h1>", None, &palette),
            build_document("<h1>x</h1>", None, &palette)
        );
    }
}
