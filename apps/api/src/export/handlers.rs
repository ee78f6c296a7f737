use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::export::{ExportError, ExportFormat};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub content: String,
    #[serde(default)]
    pub filename: String,
}

/// POST /api/v1/export/:format
///
/// Renders `content` as `text`, `markdown`, `docx`, `rtf` or `pdf` and returns the
/// file as an attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(format): Path<String>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let format: ExportFormat = format.parse().map_err(|e: ExportError| {
        let supported: Vec<String> = ExportFormat::ALL.iter().map(|f| f.to_string()).collect();
        AppError::Validation(format!("{e} (expected one of {})", supported.join(", ")))
    })?;

    let exporter = state.exporter.clone();
    let artifact = tokio::task::spawn_blocking(move || {
        exporter.export(&req.content, &req.filename, format)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("export task failed: {e}")))?
    .map_err(|e| {
        error!(format = %format, error = %e, "Export failed");
        AppError::Export(e)
    })?;

    info!(
        format = %format,
        filename = %artifact.filename,
        bytes = artifact.bytes.len(),
        "Exported document"
    );

    let disposition = format!("attachment; filename=\"{}\"", artifact.filename);
    Ok((
        [
            (header::CONTENT_TYPE, artifact.mime_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response())
}
