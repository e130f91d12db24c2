use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::{ResumeData, ResumePatch};
use crate::state::{AppState, Selection};
use crate::templates::{self, accent, AccentColor, TemplateSummary};
use crate::viewport::ZoomView;

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateSummary>> {
    Json(templates::list_templates().iter().map(|t| t.summary()).collect())
}

/// GET /api/v1/colors
pub async fn handle_list_colors() -> Json<&'static [AccentColor]> {
    Json(templates::list_accents())
}

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<ResumeData> {
    Json(state.session.read().await.resume.clone())
}

/// PUT /api/v1/resume
pub async fn handle_put_resume(
    State(state): State<AppState>,
    Json(resume): Json<ResumeData>,
) -> Result<Json<ResumeData>, AppError> {
    validate_ids(&resume)?;
    state.session.write().await.resume = resume.clone();
    debug!("Resume replaced");
    Ok(Json(resume))
}

/// PATCH /api/v1/resume
pub async fn handle_patch_resume(
    State(state): State<AppState>,
    Json(patch): Json<ResumePatch>,
) -> Result<Json<ResumeData>, AppError> {
    let mut session = state.session.write().await;
    let mut updated = session.resume.clone();
    updated.apply_patch(patch);
    validate_ids(&updated)?;
    session.resume = updated.clone();
    debug!("Resume patched");
    Ok(Json(updated))
}

fn validate_ids(resume: &ResumeData) -> Result<(), AppError> {
    match resume.duplicate_id() {
        Some((list, id)) => Err(AppError::Validation(format!("Duplicate id {id} in {list}"))),
        None => Ok(()),
    }
}

/// GET /api/v1/selection
pub async fn handle_get_selection(State(state): State<AppState>) -> Json<Selection> {
    Json(state.session.read().await.selection())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionUpdate {
    pub template_id: Option<String>,
    pub color_id: Option<String>,
}

/// PUT /api/v1/selection
pub async fn handle_put_selection(
    State(state): State<AppState>,
    Json(update): Json<SelectionUpdate>,
) -> Result<Json<Selection>, AppError> {
    let template = update
        .template_id
        .as_deref()
        .map(|id| templates::find_template(id).ok_or_else(|| AppError::NotFound(format!("Unknown template: {id}"))))
        .transpose()?;
    let color = update
        .color_id
        .as_deref()
        .map(|id| accent::find_accent(id).ok_or_else(|| AppError::Validation(format!("Unknown color: {id}"))))
        .transpose()?;

    let mut session = state.session.write().await;
    if let Some(t) = template {
        session.template_id = Some(t.id);
    }
    if let Some(c) = color {
        session.accent_id = c.id;
    }
    let selection = session.selection();
    info!(template = ?selection.template_id, color = selection.color_id, "Selection changed");
    Ok(Json(selection))
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomAction {
    Fit,
    In,
    Out,
    Set,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomRequest {
    pub action: ZoomAction,
    pub available_width: Option<f32>,
    pub value: Option<f32>,
}

/// POST /api/v1/zoom
pub async fn handle_zoom(
    State(state): State<AppState>,
    Json(req): Json<ZoomRequest>,
) -> Result<Json<ZoomView>, AppError> {
    let fitted = match req.action {
        ZoomAction::Fit => {
            let width = req
                .available_width
                .ok_or_else(|| AppError::Validation("availableWidth is required for fit".to_string()))?;
            Some(fit_preview(&state, width).await)
        }
        _ => None,
    };

    let mut session = state.session.write().await;
    match req.action {
        ZoomAction::Fit => session.zoom.apply_fit(fitted.unwrap_or_default()),
        ZoomAction::In => session.zoom.zoom_in(),
        ZoomAction::Out => session.zoom.zoom_out(),
        ZoomAction::Set => {
            let value = req
                .value
                .ok_or_else(|| AppError::Validation("value is required for set".to_string()))?;
            session.zoom.set(value);
        }
    }
    Ok(Json(session.zoom.view()))
}

/// Reports a container width to the resize watcher and waits for the fit.
pub(crate) async fn fit_preview(state: &AppState, available_width: f32) -> f32 {
    state.resize.fit(available_width).await
}
