//! Boundary transport: a `ResumeExtractor` that forwards to the
//! `POST /api/v1/extract` endpoint of an origin server.
//!
//! Errors raised on the origin side come back as `{"error": {"code", "message"}}`
//! and are rebuilt into the same `ExtractionError` kind and message, so a
//! failure on the trusted side surfaces as a failed call here.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::extraction::error::ExtractionError;
use crate::extraction::gateway::ResumeExtractor;
use crate::models::resume::{ExtractionRequest, Resume};

pub const EXTRACT_PATH: &str = "/api/v1/extract";

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

#[derive(Clone)]
pub struct RemoteExtractor {
    client: Client,
    endpoint: String,
}

impl RemoteExtractor {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}{EXTRACT_PATH}", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl ResumeExtractor for RemoteExtractor {
    async fn extract(&self, text: &str) -> Result<Resume, ExtractionError> {
        debug!(endpoint = %self.endpoint, "Forwarding extraction to origin server");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ExtractionRequest {
                text: text.to_string(),
            })
            .send()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => ExtractionError::from_code(&envelope.error.code, envelope.error.message),
                Err(_) => ExtractionError::Transport(format!(
                    "origin server returned {status} without an error body"
                )),
            });
        }

        serde_json::from_str(&body).map_err(|e| ExtractionError::MalformedResponse(e.to_string()))
    }
}
