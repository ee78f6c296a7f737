// Prompt constants for resume tailoring.
// Reuses the cross-cutting JSON-only fragment from llm_client::prompts.

pub use crate::llm_client::prompts::JSON_ONLY_SYSTEM as TAILOR_SYSTEM;

/// Tailoring prompt template. Replace `{resume_text}` and `{job_description}` before sending.
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"You are an expert resume tailor and cover letter writer. Your goal is to help a job seeker by:
1. Rewriting their resume to align with a job description
2. Creating a professional cover letter for the job
3. Explaining why both documents are well-tailored to the position

Resume:
{resume_text}

Job description:
{job_description}

Instructions:
1. Analyze the job description for key skills, keywords, responsibilities and qualifications.
2. Identify resume sections that can be rephrased or emphasized to match the job description.
3. Focus on quantifiable achievements where possible.
4. Keep the tailored resume natural and professional.
5. Do NOT invent experiences or skills that are not in the original resume. Only rephrase existing information.
6. Write a cover letter that highlights the candidate's most relevant skills and experiences for this job.
7. Briefly explain why the resume and the cover letter fit this job.

Return a JSON object with this EXACT schema:
{
  "tailored_resume": "The complete tailored resume text",
  "cover_letter": "The complete cover letter text",
  "resume_match_explanation": "How the resume aligns with the job description",
  "cover_letter_explanation": "How the cover letter supports the application"
}"#;

const RESUME_SLOT: &str = "{resume_text}";
const JOB_SLOT: &str = "{job_description}";

/// Fills both slots in one left-to-right pass, so slot-like text inside either
/// input is never substituted.
pub fn build_tailor_prompt(resume_text: &str, job_description: &str) -> String {
    let slots = [(RESUME_SLOT, resume_text), (JOB_SLOT, job_description)];
    let mut out = String::with_capacity(
        TAILOR_PROMPT_TEMPLATE.len() + resume_text.len() + job_description.len(),
    );
    let mut rest = TAILOR_PROMPT_TEMPLATE;

    while let Some((at, slot, value)) = slots
        .iter()
        .filter_map(|&(slot, value)| rest.find(slot).map(|at| (at, slot, value)))
        .min_by_key(|&(at, _, _)| at)
    {
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + slot.len()..];
    }
    out.push_str(rest);
    out
}
