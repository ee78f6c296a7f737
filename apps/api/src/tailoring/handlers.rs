use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::AppError;
use crate::state::AppState;

pub const FRIENDLY_FAILURE_MESSAGE: &str =
    "We couldn't tailor your resume at this moment. Please try again later.";

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    #[serde(default, alias = "resumeText")]
    pub resume_text: String,
    #[serde(default, alias = "jobDescription")]
    pub job_description: String,
}

/// Body returned with 200 when the model call fails, so the client can show a
/// friendly notice instead of an error page.
#[derive(Debug, Serialize)]
pub struct TailorFailure {
    pub error: bool,
    pub message: String,
    pub friendly_message: &'static str,
}

/// POST /api/v1/tailor
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(req): Json<TailorRequest>,
) -> Result<Response, AppError> {
    if req.resume_text.trim().is_empty() || req.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Both resume text and job description are required".to_string(),
        ));
    }

    let tailor = state.tailor.clone().ok_or_else(|| {
        AppError::NotImplemented("Tailoring requires ANTHROPIC_API_KEY".to_string())
    })?;

    match tailor.tailor(&req.resume_text, &req.job_description).await {
        Ok(result) => {
            info!(
                resume_chars = result.tailored_resume.len(),
                cover_letter_chars = result.cover_letter.len(),
                "Tailored resume"
            );
            Ok(Json(result).into_response())
        }
        Err(e) => {
            error!(error = %e, "Tailoring failed");
            Ok(Json(TailorFailure {
                error: true,
                message: e.to_string(),
                friendly_message: FRIENDLY_FAILURE_MESSAGE,
            })
            .into_response())
        }
    }
}
