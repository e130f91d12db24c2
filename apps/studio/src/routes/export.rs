use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue},
    response::IntoResponse,
};

use crate::errors::AppError;
use crate::export::sink::MemorySink;
use crate::export::ExportError;
use crate::state::AppState;

/// POST /api/v1/export
/// Runs the export pipeline for the session's current résumé and selection and
/// answers with the PDF as an attachment.
pub async fn handle_export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    // Snapshot so editing is never blocked by a running export.
    let (resume, template_id, accent_id) = {
        let session = state.session.read().await;
        (session.resume.clone(), session.template_id, session.accent_id)
    };
    let template_id =
        template_id.ok_or_else(|| ExportError::RenderTargetMissing("no template selected".to_string()))?;

    let sink = MemorySink::default();
    let receipt = state
        .exporter
        .export_to_file(&resume, template_id, Some(accent_id), &sink)
        .await?;
    let file = sink
        .take()
        .pop()
        .ok_or_else(|| ExportError::Delivery("export produced no file".to_string()))?;

    let export_id = HeaderValue::from_str(&receipt.export_id.to_string())
        .map_err(|e| ExportError::Delivery(e.to_string()))?;
    let disposition =
        HeaderValue::from_str(&content_disposition(&file.filename)).map_err(|e| ExportError::Delivery(e.to_string()))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(file.mime)),
            (header::CONTENT_DISPOSITION, disposition),
            (HeaderName::from_static("x-export-id"), export_id),
        ],
        file.bytes,
    ))
}

/// `attachment` disposition with an ASCII fallback name plus the exact UTF-8
/// name in `filename*`.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    let mut encoded = String::new();
    for b in filename.bytes() {
        if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
            encoded.push(b as char);
        } else {
            encoded.push_str(&format!("%{b:02X}"));
        }
    }
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_name_disposition() {
        assert_eq!(
            content_disposition("Ana_Silva_CV.pdf"),
            "attachment; filename=\"Ana_Silva_CV.pdf\"; filename*=UTF-8''Ana_Silva_CV.pdf"
        );
    }

    #[test]
    fn test_non_ascii_name_is_percent_encoded() {
        let value = content_disposition("João_CV.pdf");
        assert!(value.contains("filename=\"Jo_o_CV.pdf\""), "{value}");
        assert!(value.contains("filename*=UTF-8''Jo%C3%A3o_CV.pdf"), "{value}");
        assert!(HeaderValue::from_str(&value).is_ok());
    }
}
