//! Diagram zoom and export
//!
//! Diagrams are drawn by the script running inside the preview surface, so
//! exporting one is a round trip: the core asks the surface to serialise a
//! diagram, and the surface calls back with SVG text or a PNG data URI.
//! The target path waits in `pending` until that callback arrives.
//!
//! Only one export may be in flight. A second request is rejected with
//! [`Error::ExportInProgress`] instead of silently retargeting the first.

use crate::error::{Error, Result};
use crate::preview::PreviewSurface;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Zoom range accepted by [`DiagramController::set_zoom`].
pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 4.0;

/// Scale range for raster export.
pub const MIN_EXPORT_SCALE: f32 = 1.0;
pub const MAX_EXPORT_SCALE: f32 = 4.0;

// ─────────────────────────────────────────────────────────────────────────────
// Pending Export
// ─────────────────────────────────────────────────────────────────────────────

/// Output format of a diagram export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Png,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PendingExport {
    path: PathBuf,
    format: ExportFormat,
}

// ─────────────────────────────────────────────────────────────────────────────
// Diagram Controller
// ─────────────────────────────────────────────────────────────────────────────

/// Zoom state and the in-flight export, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramController {
    zoom: f32,
    pending: Option<PendingExport>,
}

impl Default for DiagramController {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pending: None,
        }
    }
}

impl DiagramController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom of every diagram, clamped to `MIN_ZOOM..=MAX_ZOOM`.
    ///
    /// Returns the zoom actually applied.
    pub fn set_zoom(&mut self, surface: &mut dyn PreviewSurface, scale: f32) -> f32 {
        let scale = if scale.is_finite() {
            scale.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };
        self.zoom = scale;
        surface.run_script(&format!("setDiagramZoom({});", scale));
        scale
    }

    /// Re-apply the current zoom, e.g. after the surface loaded a new document.
    pub fn reapply_zoom(&self, surface: &mut dyn PreviewSurface) {
        if (self.zoom - 1.0).abs() > f32::EPSILON {
            surface.run_script(&format!("setDiagramZoom({});", self.zoom));
        }
    }

    /// Path waiting for an export result, if any.
    pub fn pending_path(&self) -> Option<&Path> {
        self.pending.as_ref().map(|p| p.path.as_path())
    }

    pub fn is_export_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the in-flight export, returning its target path.
    pub fn cancel_export(&mut self) -> Option<PathBuf> {
        let cancelled = self.pending.take().map(|p| p.path);
        if let Some(path) = &cancelled {
            debug!("Cancelled diagram export to {}", path.display());
        }
        cancelled
    }

    fn begin(&mut self, path: PathBuf, format: ExportFormat) -> Result<()> {
        if let Some(pending) = &self.pending {
            return Err(Error::ExportInProgress {
                pending: pending.path.clone(),
            });
        }
        debug!("Requesting {:?} export to {}", format, path.display());
        self.pending = Some(PendingExport { path, format });
        Ok(())
    }

    /// Ask the surface for diagram `index` as SVG, to be written to `path`.
    pub fn export_svg(
        &mut self,
        surface: &mut dyn PreviewSurface,
        index: usize,
        path: impl Into<PathBuf>,
    ) -> Result<()> {
        self.begin(path.into(), ExportFormat::Svg)?;
        surface.run_script(&format!("exportDiagramSvg({});", index));
        Ok(())
    }

    /// Ask the surface for diagram `index` as PNG at `scale`, to be written to `path`.
    pub fn export_png(
        &mut self,
        surface: &mut dyn PreviewSurface,
        index: usize,
        path: impl Into<PathBuf>,
        scale: f32,
    ) -> Result<()> {
        let scale = if scale.is_finite() {
            scale.clamp(MIN_EXPORT_SCALE, MAX_EXPORT_SCALE)
        } else {
            MIN_EXPORT_SCALE
        };
        self.begin(path.into(), ExportFormat::Png)?;
        surface.run_script(&format!("exportDiagramPng({}, {});", index, scale));
        Ok(())
    }

    /// Take the pending export if it expects `format`.
    ///
    /// A result of the wrong kind leaves the pending export in place.
    fn take_pending(&mut self, format: ExportFormat) -> Result<PathBuf> {
        match self.pending.take() {
            Some(pending) if pending.format == format => Ok(pending.path),
            Some(pending) => {
                warn!(
                    "Ignoring {:?} result while a {:?} export is pending",
                    format, pending.format
                );
                self.pending = Some(pending);
                Err(Error::NoPendingExport)
            }
            None => {
                warn!("Ignoring {:?} result with no export pending", format);
                Err(Error::NoPendingExport)
            }
        }
    }

    /// Callback: the surface delivered SVG markup.
    ///
    /// Returns the path written. The pending export is cleared even if the
    /// write fails.
    pub fn on_svg_ready(&mut self, svg: &str) -> Result<PathBuf> {
        let path = self.take_pending(ExportFormat::Svg)?;
        write_export(&path, svg.as_bytes())?;
        Ok(path)
    }

    /// Callback: the surface delivered a PNG as a base64 `data:` URI.
    ///
    /// Returns the path written. The pending export is cleared even if the
    /// payload is invalid.
    pub fn on_png_ready(&mut self, data_uri: &str) -> Result<PathBuf> {
        let path = self.take_pending(ExportFormat::Png)?;
        let bytes = decode_data_uri(data_uri)?;
        write_export(&path, &bytes)?;
        Ok(path)
    }
}

fn write_export(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!("Diagram exported to {}", path.display());
    Ok(())
}

/// Decode the payload of a base64 `data:` URI.
pub fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>> {
    let rest = data_uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidDataUri("missing 'data:' prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidDataUri("missing ',' separator".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(Error::InvalidDataUri("payload is not base64".to_string()));
    }
    STANDARD
        .decode(payload)
        .map_err(|e| Error::InvalidDataUri(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
