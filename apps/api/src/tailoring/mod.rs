//! Resume tailoring: the upstream collaborator that rewrites a resume for a job
//! description and drafts a cover letter.
//!
//! The HTTP layer only sees the [`ResumeTailor`] trait. `AppState` carries an
//! `Option<Arc<dyn ResumeTailor>>`; the model-backed [`LlmTailor`] is installed at
//! startup when an API key is configured.

pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::llm_client::{strip_json_fences, LlmClient, LlmError};
use crate::tailoring::prompts::{build_tailor_prompt, TAILOR_SYSTEM};

pub const DEFAULT_RESUME_EXPLANATION: &str =
    "This resume has been tailored to highlight experiences and skills most relevant to the job description.";
pub const DEFAULT_COVER_LETTER_EXPLANATION: &str =
    "This cover letter emphasizes your most relevant qualifications and expresses your interest in the position.";
const UNPARSED_COVER_LETTER: &str =
    "We couldn't generate a cover letter at this time. Please try again.";
const UNPARSED_COVER_LETTER_EXPLANATION: &str =
    "Cover letter generation encountered an issue. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailorResult {
    pub tailored_resume: String,
    pub cover_letter: String,
    pub resume_match_explanation: String,
    pub cover_letter_explanation: String,
}

#[derive(Debug, Error)]
pub enum TailorError {
    #[error("Model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("Model response is missing {0}")]
    Incomplete(&'static str),
}

#[async_trait]
pub trait ResumeTailor: Send + Sync {
    async fn tailor(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<TailorResult, TailorError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmTailor
// ────────────────────────────────────────────────────────────────────────────

/// Tailors through the Anthropic client.
pub struct LlmTailor {
    llm: LlmClient,
}

impl LlmTailor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeTailor for LlmTailor {
    async fn tailor(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<TailorResult, TailorError> {
        let prompt = build_tailor_prompt(resume_text, job_description);
        let response = self.llm.call(&prompt, TAILOR_SYSTEM).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        interpret_response(text)
    }
}

/// Model output as it may arrive: every field optional.
#[derive(Debug, Deserialize)]
struct RawTailorResponse {
    #[serde(alias = "tailoredResume")]
    tailored_resume: Option<String>,
    #[serde(alias = "coverLetter")]
    cover_letter: Option<String>,
    #[serde(alias = "resumeMatchExplanation")]
    resume_match_explanation: Option<String>,
    #[serde(alias = "coverLetterExplanation")]
    cover_letter_explanation: Option<String>,
}

/// Turns model text into a result.
///
/// Valid JSON must carry both documents; missing explanations get default
/// sentences. Text that is not JSON at all is taken as the tailored resume itself.
pub fn interpret_response(text: &str) -> Result<TailorResult, TailorError> {
    let json = json_object_span(strip_json_fences(text));

    let raw: RawTailorResponse = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Tailoring response is not JSON, using it as the resume");
            let resume = text.trim();
            if resume.is_empty() {
                return Err(TailorError::Incomplete("tailored_resume"));
            }
            return Ok(TailorResult {
                tailored_resume: resume.to_string(),
                cover_letter: UNPARSED_COVER_LETTER.to_string(),
                resume_match_explanation: DEFAULT_RESUME_EXPLANATION.to_string(),
                cover_letter_explanation: UNPARSED_COVER_LETTER_EXPLANATION.to_string(),
            });
        }
    };

    Ok(TailorResult {
        tailored_resume: non_empty(raw.tailored_resume)
            .ok_or(TailorError::Incomplete("tailored_resume"))?,
        cover_letter: non_empty(raw.cover_letter).ok_or(TailorError::Incomplete("cover_letter"))?,
        resume_match_explanation: non_empty(raw.resume_match_explanation)
            .unwrap_or_else(|| DEFAULT_RESUME_EXPLANATION.to_string()),
        cover_letter_explanation: non_empty(raw.cover_letter_explanation)
            .unwrap_or_else(|| DEFAULT_COVER_LETTER_EXPLANATION.to_string()),
    })
}

/// Narrows `text` to the outermost `{...}` when the model wraps JSON in prose.
fn json_object_span(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
