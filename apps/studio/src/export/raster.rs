//! SVG → bitmap capture.

use std::sync::Arc;

use image::RgbImage;
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg;
use tracing::{debug, info};

use crate::export::ExportError;

/// Captures a staged SVG document as an opaque RGB bitmap.
pub trait Rasterizer: Send + Sync {
    /// False when capture cannot work at all (e.g. no fonts to draw text with).
    fn is_available(&self) -> bool;

    /// Renders `svg` at `scale` device pixels per CSS pixel onto white.
    fn rasterize(&self, svg: &str, scale: f32) -> Result<RgbImage, ExportError>;
}

/// `resvg` backed rasterizer sharing one system font database.
pub struct ResvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl ResvgRasterizer {
    /// Loads system fonts. Slow, so call once at startup.
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        info!(faces = db.len(), "Font database loaded");
        Self::with_fonts(db)
    }

    pub fn with_fonts(db: usvg::fontdb::Database) -> Self {
        Self { fontdb: Arc::new(db) }
    }

    fn options(&self) -> usvg::Options<'static> {
        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fontdb);
        options
    }
}

impl Rasterizer for ResvgRasterizer {
    fn is_available(&self) -> bool {
        !self.fontdb.is_empty()
    }

    fn rasterize(&self, svg: &str, scale: f32) -> Result<RgbImage, ExportError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ExportError::Rasterization(format!("invalid scale {scale}")));
        }
        let tree = usvg::Tree::from_str(svg, &self.options())
            .map_err(|e| ExportError::Rasterization(format!("cannot parse document: {e}")))?;

        let size = tree.size();
        let width = (size.width() * scale).ceil() as u32;
        let height = (size.height() * scale).ceil() as u32;
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| ExportError::Rasterization(format!("cannot allocate {width}x{height} bitmap")))?;

        // Captures are always on white, whatever the surrounding theme.
        pixmap.fill(Color::WHITE);
        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
        debug!(width, height, scale, "Document rasterized");

        // Opaque background, so premultiplied and straight RGB coincide.
        let rgb: Vec<u8> = pixmap.data().chunks_exact(4).flat_map(|px| [px[0], px[1], px[2]]).collect();
        RgbImage::from_raw(width, height, rgb)
            .ok_or_else(|| ExportError::Rasterization("bitmap size mismatch".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rasterizer() -> ResvgRasterizer {
        ResvgRasterizer::with_fonts(usvg::fontdb::Database::new())
    }

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="20" viewBox="0 0 10 20">
        <rect x="0" y="10" width="10" height="10" fill="#FF0000"/></svg>"##;

    #[test]
    fn test_supersampled_size_and_white_background() {
        let bitmap = rasterizer().rasterize(SQUARE, 2.0).unwrap();
        assert_eq!(bitmap.dimensions(), (20, 40));
        assert_eq!(bitmap.get_pixel(5, 5).0, [255, 255, 255]);
        assert_eq!(bitmap.get_pixel(5, 30).0, [255, 0, 0]);
    }

    #[test]
    fn test_invalid_document_is_rasterization_error() {
        let err = rasterizer().rasterize("<not-svg", 2.0).unwrap_err();
        assert!(matches!(err, ExportError::Rasterization(_)));
    }

    #[test]
    fn test_empty_font_database_is_unavailable() {
        assert!(!rasterizer().is_available());
    }
}
