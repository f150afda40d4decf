// Prompt constants for resume extraction.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume extraction — enforces JSON-only output.
pub const EXTRACT_RESUME_SYSTEM: &str = "You are an expert resume parser. \
    Extract structured fields from free-form resume text. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Resume extraction prompt template. Replace `{no_invention}` and `{resume}` before sending.
pub const EXTRACT_RESUME_PROMPT_TEMPLATE: &str = r#"Extract the following resume into structured fields.

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "Full name of the candidate",
  "email": "candidate@example.com",
  "experience": [
    "Role at Company"
  ],
  "skills": [
    "Skill"
  ]
}

Keep experience and skills in the order they appear in the text.

{no_invention}

Resume:
{resume}"#;
