use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::export::ExportPipeline;
use crate::models::ResumeData;
use crate::templates::{self, accent};
use crate::viewport::{ResizeWatcher, ZoomState};

/// The one editing session this studio serves: the résumé being edited plus
/// the current template, accent and preview zoom.
#[derive(Debug, Clone)]
pub struct Session {
    pub resume: ResumeData,
    /// `None` only when no template is registered.
    pub template_id: Option<&'static str>,
    pub accent_id: &'static str,
    pub zoom: ZoomState,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            resume: ResumeData::default(),
            template_id: templates::default_template_id(),
            accent_id: accent::default_accent_id(),
            zoom: ZoomState::default(),
        }
    }
}

impl Session {
    pub fn selection(&self) -> Selection {
        Selection {
            template_id: self.template_id,
            color_id: self.accent_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub template_id: Option<&'static str>,
    pub color_id: &'static str,
}

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: Arc<RwLock<Session>>,
    pub exporter: Arc<ExportPipeline>,
    /// Turns reported container widths into fit zooms after the settle delay.
    pub resize: Arc<ResizeWatcher>,
}

impl AppState {
    pub fn new(config: Config, exporter: ExportPipeline, resize: ResizeWatcher) -> Self {
        Self {
            config,
            session: Arc::new(RwLock::new(Session::default())),
            exporter: Arc::new(exporter),
            resize: Arc::new(resize),
        }
    }
}
