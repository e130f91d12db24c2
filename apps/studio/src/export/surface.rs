//! Off-screen render surface: a private temp directory holding the staged
//! export-mode SVG. Nothing outside the pipeline ever sees it, and it is
//! removed when the surface is closed or dropped.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::export::ExportError;
use crate::layout::fragment::Fragment;
use crate::layout::svg::to_svg_string;

const STAGED_FILE: &str = "document.svg";

#[derive(Debug)]
pub struct OffscreenSurface {
    dir: TempDir,
    staged: PathBuf,
}

impl OffscreenSurface {
    /// Creates the surface under `root`, or the system temp directory.
    pub fn create(root: Option<&Path>) -> Result<Self, ExportError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("studio-export-");
        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
            .map_err(|e| ExportError::RenderTargetMissing(format!("cannot create surface: {e}")))?;
        let staged = dir.path().join(STAGED_FILE);
        debug!(path = %dir.path().display(), "Off-screen surface created");
        Ok(Self { dir, staged })
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes the fragment as a 210 mm wide SVG document.
    pub async fn stage(&self, fragment: &Fragment) -> Result<(), ExportError> {
        tokio::fs::write(&self.staged, to_svg_string(fragment))
            .await
            .map_err(|e| ExportError::RenderTargetMissing(format!("cannot stage document: {e}")))
    }

    /// Reads the staged document back. A missing or empty file means nothing
    /// was rendered into the surface.
    pub async fn staged_document(&self) -> Result<String, ExportError> {
        let svg = tokio::fs::read_to_string(&self.staged)
            .await
            .map_err(|_| ExportError::RenderTargetMissing("surface holds no document".to_string()))?;
        if !svg.contains("<svg") {
            return Err(ExportError::RenderTargetMissing("surface holds no document".to_string()));
        }
        Ok(svg)
    }

    /// Removes the surface, reporting any filesystem error instead of
    /// swallowing it as `Drop` would.
    pub fn close(self) -> std::io::Result<()> {
        debug!(path = %self.dir.path().display(), "Off-screen surface removed");
        self.dir.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResumeData;
    use crate::templates;

    #[tokio::test]
    async fn test_stage_and_read_back() {
        let surface = OffscreenSurface::create(None).unwrap();
        let fragment = templates::render(&ResumeData::default(), "modern", None, true).unwrap();
        surface.stage(&fragment).await.unwrap();
        let svg = surface.staged_document().await.unwrap();
        assert!(svg.contains("width=\"210"), "{}", &svg[..svg.len().min(200)]);
    }

    #[tokio::test]
    async fn test_unstaged_surface_is_missing_target() {
        let surface = OffscreenSurface::create(None).unwrap();
        let err = surface.staged_document().await.unwrap_err();
        assert!(matches!(err, ExportError::RenderTargetMissing(_)));
    }

    #[tokio::test]
    async fn test_close_removes_directory() {
        let surface = OffscreenSurface::create(None).unwrap();
        let path = surface.path().to_path_buf();
        assert!(path.exists());
        surface.close().unwrap();
        assert!(!path.exists());
    }
}
