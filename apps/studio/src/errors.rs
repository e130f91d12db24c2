use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::templates::RenderError;

/// Error returned by every studio handler; rendered as `{"error": {code, message}}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::NotFound(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Export(e) => export_status(e),
            AppError::Internal(e) => {
                tracing::error!(error = ?e, "Unhandled studio error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Erro interno do servidor".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn export_status(err: &ExportError) -> (StatusCode, &'static str, String) {
    match err {
        ExportError::Busy => (StatusCode::CONFLICT, "EXPORT_BUSY", err.to_string()),
        ExportError::CapabilityMissing(_) => (StatusCode::SERVICE_UNAVAILABLE, "EXPORT_UNAVAILABLE", err.to_string()),
        ExportError::RenderTargetMissing(_) => {
            tracing::warn!("Export target missing: {err}");
            (StatusCode::NOT_FOUND, "RENDER_TARGET_MISSING", err.to_string())
        }
        ExportError::Rasterization(_) | ExportError::Assembly(_) | ExportError::Delivery(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "EXPORT_FAILED",
            "Ocorreu um erro ao tentar gerar o PDF. Por favor, tente novamente.".to_string(),
        ),
    }
}
