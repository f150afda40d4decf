// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Instruction that forbids filling gaps with invented content.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    CRITICAL: Only use information present in the input text. \
    Do NOT infer, interpolate, or invent details. \
    If a field is absent from the text, return an empty string or an empty list.";
