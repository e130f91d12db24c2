pub mod export;
pub mod health;
pub mod preview;
pub mod session;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Registry
        .route("/api/v1/templates", get(session::handle_list_templates))
        .route("/api/v1/colors", get(session::handle_list_colors))
        // Session
        .route(
            "/api/v1/resume",
            get(session::handle_get_resume)
                .put(session::handle_put_resume)
                .patch(session::handle_patch_resume),
        )
        .route(
            "/api/v1/selection",
            get(session::handle_get_selection).put(session::handle_put_selection),
        )
        .route("/api/v1/zoom", post(session::handle_zoom))
        // Preview
        .route("/preview", get(preview::handle_preview))
        .route("/preview.svg", get(preview::handle_preview_svg))
        // Export
        .route("/api/v1/export", post(export::handle_export))
        .with_state(state)
}
