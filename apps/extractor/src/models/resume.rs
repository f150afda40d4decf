use serde::{Deserialize, Serialize};

/// Structured fields extracted from free-form resume text.
/// Only the extraction gateway constructs these; nothing mutates them afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resume {
    pub name: String,
    pub email: String,
    pub experience: Vec<String>,
    pub skills: Vec<String>,
}

impl Resume {
    /// Initials for the avatar badge, e.g. "Vaibhav Gupta" -> "VG".
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

/// The input driving one extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub text: String,
}
