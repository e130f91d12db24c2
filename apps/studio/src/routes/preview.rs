use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::layout::fragment::Fragment;
use crate::layout::svg::to_svg_string;
use crate::routes::session::fit_preview;
use crate::state::AppState;
use crate::templates::find_template;
use crate::viewport::ZoomView;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQuery {
    pub available_width: Option<f32>,
}

/// Renders the session's current selection in screen mode.
/// `Ok(None)` means no template is selected.
async fn current_fragment(state: &AppState) -> Result<Option<Fragment>, AppError> {
    let session = state.session.read().await;
    let Some(template_id) = session.template_id else {
        return Ok(None);
    };
    let template =
        find_template(template_id).ok_or_else(|| AppError::NotFound(format!("Unknown template: {template_id}")))?;
    Ok(Some(template.render_with(&session.resume, Some(session.accent_id), false)))
}

/// GET /preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Html<String>, AppError> {
    if let Some(width) = query.available_width {
        let zoom = fit_preview(&state, width).await;
        state.session.write().await.zoom.apply_fit(zoom);
    }

    let zoom = state.session.read().await.zoom.view();
    let body = match current_fragment(&state).await? {
        Some(fragment) => scaled_page(&fragment, &zoom),
        None => r#"<div class="empty">Selecione um modelo</div>"#.to_string(),
    };
    Ok(Html(page(&body, &zoom)))
}

/// GET /preview.svg
pub async fn handle_preview_svg(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let fragment = current_fragment(&state)
        .await?
        .ok_or_else(|| AppError::NotFound("No template selected".to_string()))?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], to_svg_string(&fragment)))
}

fn scaled_page(fragment: &Fragment, zoom: &ZoomView) -> String {
    let opacity = if zoom.visible { 1 } else { 0 };
    format!(
        r#"<div class="page" data-template="{id}" style="transform: {transform}; transform-origin: {origin}; opacity: {opacity};">{svg}</div>"#,
        id = fragment.template_id,
        transform = zoom.transform,
        origin = zoom.transform_origin,
        svg = to_svg_string(fragment),
    )
}

fn page(body: &str, zoom: &ZoomView) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt">
<head>
<meta charset="utf-8">
<title>Pré-visualização</title>
<style>
  body {{ margin: 0; background: #E5E7EB; font-family: sans-serif; }}
  .toolbar {{ padding: 8px 16px; color: #374151; }}
  .stage {{ display: flex; justify-content: center; padding: 16px; overflow: auto; }}
  .page {{ box-shadow: 0 10px 25px rgba(0,0,0,0.15); background: #FFFFFF; }}
  .page svg {{ display: block; }}
  .empty {{ padding: 48px; color: #4B5563; }}
</style>
</head>
<body>
<div class="toolbar">Zoom: {percent}</div>
<div class="stage">{body}</div>
</body>
</html>
"#,
        percent = zoom.percent,
    )
}
