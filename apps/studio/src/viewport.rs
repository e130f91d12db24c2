//! Preview scaling.
//!
//! The rendered page keeps its intrinsic A4 size; the preview only applies a
//! CSS `scale(z)` around the top centre. `z` is either fitted to the container
//! width or adjusted by hand within fixed bounds.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

pub const MIN_ZOOM: f32 = 0.2;
pub const MAX_ZOOM: f32 = 2.0;
pub const ZOOM_STEP: f32 = 0.1;

/// Zoom that makes `intrinsic` fill `available`. Unclamped: a wide container
/// may scale the page up past 100%.
///
/// Returns 0 ("not measured yet") when either width is non-positive or not finite.
pub fn fit_zoom(available: f32, intrinsic: f32) -> f32 {
    if !(available.is_finite() && intrinsic.is_finite()) || available <= 0.0 || intrinsic <= 0.0 {
        return 0.0;
    }
    available / intrinsic
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomState {
    zoom: f32,
}

impl ZoomState {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Stores an auto-fit result as is.
    pub fn apply_fit(&mut self, zoom: f32) {
        self.zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 0.0 };
    }

    pub fn set(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set(round_step(self.zoom + ZOOM_STEP));
    }

    pub fn zoom_out(&mut self) {
        self.set(round_step(self.zoom - ZOOM_STEP));
    }

    /// The preview stays transparent until a first measurement lands.
    pub fn is_visible(&self) -> bool {
        self.zoom > 0.0
    }

    pub fn percent_label(&self) -> String {
        format!("{}%", (self.zoom * 100.0).round() as i32)
    }

    pub fn transform(&self) -> String {
        format!("scale({})", self.zoom)
    }

    pub fn view(&self) -> ZoomView {
        ZoomView {
            zoom: self.zoom,
            percent: self.percent_label(),
            visible: self.is_visible(),
            transform: self.transform(),
            transform_origin: "top center",
        }
    }
}

// Keeps repeated steps on the 0.1 grid instead of drifting by float error.
fn round_step(z: f32) -> f32 {
    (z * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ZoomView {
    pub zoom: f32,
    pub percent: String,
    pub visible: bool,
    pub transform: String,
    pub transform_origin: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Resize watcher
// ────────────────────────────────────────────────────────────────────────────

/// Background task turning container widths into fit zooms.
///
/// The first measurement waits `settle` so a burst of early resizes collapses
/// into one; after that every width change is answered immediately. Widths carry
/// a sequence number and each published zoom names the latest one it saw.
pub struct ResizeWatcher {
    intrinsic_width: f32,
    width_tx: watch::Sender<(u64, f32)>,
    zoom_rx: watch::Receiver<(u64, f32)>,
    task: JoinHandle<()>,
}

impl ResizeWatcher {
    pub fn spawn(intrinsic_width: f32, settle: Duration) -> Self {
        let (width_tx, mut width_rx) = watch::channel((0_u64, 0.0_f32));
        let (zoom_tx, zoom_rx) = watch::channel((0_u64, 0.0_f32));

        let task = tokio::spawn(async move {
            tokio::time::sleep(settle).await;
            loop {
                let (seq, width) = *width_rx.borrow_and_update();
                let zoom = fit_zoom(width, intrinsic_width);
                debug!(seq, width, zoom, "Preview refit");
                zoom_tx.send_replace((seq, zoom));
                if width_rx.changed().await.is_err() {
                    break;
                }
            }
        });

        Self { intrinsic_width, width_tx, zoom_rx, task }
    }

    /// Reports a new container width and returns its sequence number.
    pub fn resize(&self, available_width: f32) -> u64 {
        let mut seq = 0;
        self.width_tx.send_modify(|current| {
            seq = current.0 + 1;
            *current = (seq, available_width);
        });
        seq
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<(u64, f32)> {
        self.zoom_rx.clone()
    }

    /// Reports `available_width`, waits until the watcher has caught up with it,
    /// and returns the zoom for this width. A concurrent resize never leaks its
    /// zoom into this call.
    pub async fn fit(&self, available_width: f32) -> f32 {
        let seq = self.resize(available_width);
        let mut rx = self.zoom_rx.clone();
        if rx.wait_for(|(published, _)| *published >= seq).await.is_err() {
            debug!(seq, "Resize watcher stopped before catching up");
        }
        fit_zoom(available_width, self.intrinsic_width)
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
