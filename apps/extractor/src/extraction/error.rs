use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::LlmError;

/// Everything that can go wrong between handing text to the gateway and
/// receiving a `Resume` back.
///
/// Each variant carries the user-facing message, and `Display` prints it
/// verbatim so the error view and the boundary transport never rewrite it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ExtractionError {
    /// Network or environment-boundary failure.
    #[error("{0}")]
    Transport(String),

    /// The extraction capability reported a failure.
    #[error("{0}")]
    Backend(String),

    /// The backend answered, but not with the expected resume shape.
    #[error("{0}")]
    MalformedResponse(String),

    /// The per-call deadline elapsed before the backend answered.
    #[error("{0}")]
    Timeout(String),

    /// The text was rejected before any backend was called.
    #[error("{0}")]
    InvalidInput(String),
}

impl ExtractionError {
    pub fn timeout(deadline: Duration) -> Self {
        ExtractionError::Timeout(format!(
            "extraction timed out after {}s",
            deadline.as_secs_f64()
        ))
    }

    pub fn message(&self) -> &str {
        match self {
            ExtractionError::Transport(m)
            | ExtractionError::Backend(m)
            | ExtractionError::MalformedResponse(m)
            | ExtractionError::Timeout(m)
            | ExtractionError::InvalidInput(m) => m,
        }
    }

    /// Malformed responses are a kind of backend error.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            ExtractionError::Backend(_) | ExtractionError::MalformedResponse(_)
        )
    }

    /// Stable wire code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ExtractionError::Transport(_) => "TRANSPORT_ERROR",
            ExtractionError::Backend(_) => "BACKEND_ERROR",
            ExtractionError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            ExtractionError::Timeout(_) => "TIMEOUT",
            ExtractionError::InvalidInput(_) => "INVALID_INPUT",
        }
    }

    /// Inverse of [`ExtractionError::code`]. Unknown codes become `Backend`
    /// since the remote side did answer.
    pub fn from_code(code: &str, message: String) -> Self {
        match code {
            "TRANSPORT_ERROR" => ExtractionError::Transport(message),
            "MALFORMED_RESPONSE" => ExtractionError::MalformedResponse(message),
            "TIMEOUT" => ExtractionError::Timeout(message),
            "INVALID_INPUT" => ExtractionError::InvalidInput(message),
            _ => ExtractionError::Backend(message),
        }
    }
}

impl From<LlmError> for ExtractionError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Http(e) if e.is_timeout() => ExtractionError::Timeout(e.to_string()),
            LlmError::Http(e) if e.is_decode() => ExtractionError::MalformedResponse(e.to_string()),
            LlmError::Http(e) => ExtractionError::Transport(e.to_string()),
            LlmError::Api { message, .. } => ExtractionError::Backend(message),
            e @ (LlmError::Parse(_) | LlmError::EmptyContent) => {
                ExtractionError::MalformedResponse(e.to_string())
            }
        }
    }
}
