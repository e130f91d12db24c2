use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a status object with service version and export readiness.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "studio",
        "export": {
            "available": state.exporter.is_available(),
            "busy": state.exporter.is_busy(),
            "surfaces": state.exporter.surfaces_created(),
        }
    }))
}
