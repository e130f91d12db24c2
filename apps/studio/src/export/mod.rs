//! Résumé → PDF export.
//!
//! 1. Refuse if another export is running, or if capture is impossible.
//! 2. Render the selected template in export mode.
//! 3. Stage it on a private off-screen surface and let it settle.
//! 4. Rasterize at the supersampling scale, onto white.
//! 5. Assemble the bitmap into a PDF and hand it to the download sink.
//! 6. Remove the surface, whatever happened in between.
//!
//! Rasterization and assembly are CPU-bound and run on the blocking pool.

pub mod document;
pub mod filename;
pub mod raster;
pub mod sink;
pub mod surface;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::layout::fragment::Fragment;
use crate::models::ResumeData;
use crate::templates::{self, RenderError};

use document::{DocumentAssembler, PixelBlock};
use filename::export_filename;
use raster::Rasterizer;
use sink::{DownloadSink, ExportFile, PDF_MIME};
use surface::OffscreenSurface;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export unavailable: {0}")]
    CapabilityMissing(String),

    #[error("Nothing to capture: {0}")]
    RenderTargetMissing(String),

    #[error("Rasterization failed: {0}")]
    Rasterization(String),

    #[error("Document assembly failed: {0}")]
    Assembly(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("An export is already in progress")]
    Busy,
}

impl From<RenderError> for ExportError {
    fn from(err: RenderError) -> Self {
        ExportError::RenderTargetMissing(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Wait between staging and capture.
    pub settle: Duration,
    /// Device pixels per CSS pixel.
    pub raster_scale: f32,
    /// Parent of the off-screen surfaces; the system temp dir when `None`.
    pub surface_root: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(500),
            raster_scale: 2.0,
            surface_root: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportReceipt {
    pub export_id: Uuid,
    pub filename: String,
    pub page_count: usize,
    pub size_bytes: usize,
}

pub struct ExportPipeline {
    rasterizer: Arc<dyn Rasterizer>,
    assembler: Arc<dyn DocumentAssembler>,
    settings: ExportSettings,
    in_flight: AtomicBool,
    surfaces_created: AtomicUsize,
}

/// Clears the in-flight flag however the export ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ExportPipeline {
    pub fn new(
        rasterizer: Arc<dyn Rasterizer>,
        assembler: Arc<dyn DocumentAssembler>,
        settings: ExportSettings,
    ) -> Self {
        Self {
            rasterizer,
            assembler,
            settings,
            in_flight: AtomicBool::new(false),
            surfaces_created: AtomicUsize::new(0),
        }
    }

    pub fn is_available(&self) -> bool {
        self.rasterizer.is_available() && self.assembler.is_available()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Number of off-screen surfaces created since startup.
    pub fn surfaces_created(&self) -> usize {
        self.surfaces_created.load(Ordering::Relaxed)
    }

    fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.in_flight))
    }

    /// Exports `data` rendered with `template_id` and delivers the PDF to `sink`.
    pub async fn export_to_file(
        &self,
        data: &ResumeData,
        template_id: &str,
        accent_id: Option<&str>,
        sink: &dyn DownloadSink,
    ) -> Result<ExportReceipt, ExportError> {
        let Some(_guard) = self.try_begin() else {
            warn!(template = template_id, "Export rejected: another export is in progress");
            return Err(ExportError::Busy);
        };

        let export_id = Uuid::new_v4();
        let span = info_span!("export", %export_id, template = template_id);
        async move {
            if !self.is_available() {
                error!("Export unavailable: capture or assembly backend missing");
                return Err(ExportError::CapabilityMissing(
                    "no fonts available to rasterize the document".to_string(),
                ));
            }

            let fragment = templates::render(data, template_id, accent_id, true).map_err(|e| {
                warn!(error = %e, "Export target missing");
                ExportError::from(e)
            })?;

            let surface = OffscreenSurface::create(self.settings.surface_root.as_deref())?;
            self.surfaces_created.fetch_add(1, Ordering::Relaxed);

            let outcome = self
                .capture_and_deliver(export_id, &surface, &fragment, &data.personal_info.full_name, sink)
                .await;

            if let Err(e) = surface.close() {
                warn!(error = %e, "Failed to remove off-screen surface");
            }

            match &outcome {
                Ok(receipt) => info!(
                    filename = %receipt.filename,
                    pages = receipt.page_count,
                    bytes = receipt.size_bytes,
                    "Export delivered"
                ),
                Err(e) => error!(error = %e, "Export failed"),
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn capture_and_deliver(
        &self,
        export_id: Uuid,
        surface: &OffscreenSurface,
        fragment: &Fragment,
        full_name: &str,
        sink: &dyn DownloadSink,
    ) -> Result<ExportReceipt, ExportError> {
        surface.stage(fragment).await?;
        if !self.settings.settle.is_zero() {
            tokio::time::sleep(self.settings.settle).await;
        }
        let svg = surface.staged_document().await?;

        let scale = self.settings.raster_scale;
        let blocks = pixel_blocks(fragment, scale);
        let rasterizer = Arc::clone(&self.rasterizer);
        let assembler = Arc::clone(&self.assembler);
        let document = tokio::task::spawn_blocking(move || {
            let bitmap = rasterizer.rasterize(&svg, scale)?;
            assembler.assemble(&bitmap, &blocks)
        })
        .await
        .map_err(|e| ExportError::Rasterization(format!("capture task failed: {e}")))??;

        let receipt = ExportReceipt {
            export_id,
            filename: export_filename(full_name),
            page_count: document.page_count,
            size_bytes: document.bytes.len(),
        };
        sink.deliver(ExportFile {
            filename: receipt.filename.clone(),
            mime: PDF_MIME,
            bytes: Bytes::from(document.bytes),
        })
        .await?;
        Ok(receipt)
    }
}

/// Fragment blocks in bitmap pixels. Both edges round the same way so blocks that
/// touch in layout still share an edge after scaling.
fn pixel_blocks(fragment: &Fragment, scale: f32) -> Vec<PixelBlock> {
    fragment
        .blocks
        .iter()
        .map(|b| PixelBlock {
            top: (b.top * scale).round().max(0.0) as u32,
            bottom: (b.bottom * scale).round().max(0.0) as u32,
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
