use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::extraction::{parse_file, MediaType};

#[derive(Debug, Serialize)]
pub struct ParseFileResponse {
    pub text: String,
}

/// POST /api/v1/parse-file
///
/// Multipart upload with a `file` part. Always answers 200 with `{ "text": ... }`
/// once a file is present; extraction failures are reported inside `text`.
pub async fn handle_parse_file(
    mut multipart: Multipart,
) -> Result<Json<ParseFileResponse>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let declared = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        let media_type = resolve_media_type(&declared, &filename);

        if !MediaType::parse(&media_type).is_accepted() {
            warn!(filename = %filename, media_type = %media_type, "Upload is not an accepted resume type");
        }

        info!(
            filename = %filename,
            media_type = %media_type,
            bytes = bytes.len(),
            "Processing uploaded file"
        );

        let text = match tokio::task::spawn_blocking(move || parse_file(&bytes, &media_type)).await
        {
            Ok(text) => text,
            Err(e) => {
                error!(filename = %filename, error = %e, "Extraction task failed");
                format!("Failed to extract text from {filename}")
            }
        };

        return Ok(Json(ParseFileResponse { text }));
    }

    Err(AppError::Validation("No file provided".to_string()))
}

/// Picks the media type to dispatch on. The part's declared type wins unless it is
/// missing or the generic `application/octet-stream`, in which case the file
/// extension decides.
pub fn resolve_media_type(declared: &str, filename: &str) -> String {
    let generic = matches!(
        MediaType::parse(declared),
        MediaType::Other(ref raw) if raw.is_empty() || raw == "application/octet-stream"
    );
    if !generic {
        return declared.to_string();
    }

    MediaType::from_extension(filename)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| {
            if declared.trim().is_empty() {
                "application/octet-stream".to_string()
            } else {
                declared.to_string()
            }
        })
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}
