//! LLM-backed extraction: the production `ResumeExtractor`.

use async_trait::async_trait;

use crate::extraction::error::ExtractionError;
use crate::extraction::gateway::ResumeExtractor;
use crate::extraction::prompts::{EXTRACT_RESUME_PROMPT_TEMPLATE, EXTRACT_RESUME_SYSTEM};
use crate::llm_client::prompts::NO_INVENTION_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::models::resume::Resume;

pub struct LlmResumeExtractor {
    llm: LlmClient,
}

impl LlmResumeExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeExtractor for LlmResumeExtractor {
    async fn extract(&self, text: &str) -> Result<Resume, ExtractionError> {
        let prompt = build_prompt(text);
        self.llm
            .call_json::<Resume>(&prompt, EXTRACT_RESUME_SYSTEM)
            .await
            .map_err(ExtractionError::from)
    }
}

fn build_prompt(text: &str) -> String {
    EXTRACT_RESUME_PROMPT_TEMPLATE
        .replace("{no_invention}", NO_INVENTION_INSTRUCTION)
        .replace("{resume}", text)
}
