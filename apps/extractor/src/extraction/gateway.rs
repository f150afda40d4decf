//! Resume Extraction Gateway — the only path from free text to a `Resume`.
//!
//! The gateway wraps a pluggable `ResumeExtractor` backend. It behaves the same
//! whether the caller is in-process (the server-rendered page) or arrived over
//! HTTP (`POST /api/v1/extract`): where the call came from is a transport
//! concern, never a branch here.
//!
//! No retries. A failed attempt is returned as-is; retrying is an explicit
//! refetch by the caller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::extraction::error::ExtractionError;
use crate::extraction::observer::{ExtractionEvent, ExtractionObserver};
use crate::models::resume::Resume;

/// A backend able to turn resume text into structured fields.
///
/// Implementations: `LlmResumeExtractor` (calls the LLM directly) and
/// `RemoteExtractor` (proxies to another instance of this server).
#[async_trait]
pub trait ResumeExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<Resume, ExtractionError>;
}

#[derive(Clone)]
pub struct ResumeExtractionGateway {
    extractor: Arc<dyn ResumeExtractor>,
    observer: Arc<dyn ExtractionObserver>,
    deadline: Option<Duration>,
}

impl ResumeExtractionGateway {
    pub fn new(extractor: Arc<dyn ResumeExtractor>, observer: Arc<dyn ExtractionObserver>) -> Self {
        Self {
            extractor,
            observer,
            deadline: None,
        }
    }

    /// Fails calls that take longer than `deadline` with `ExtractionError::Timeout`.
    /// The in-flight backend future is dropped on expiry.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub async fn extract_resume(&self, text: &str) -> Result<Resume, ExtractionError> {
        self.observer.record(ExtractionEvent::GatewayStarted {
            text_len: text.len(),
        });
        let started = Instant::now();

        let outcome = if text.trim().is_empty() {
            Err(ExtractionError::InvalidInput(
                "text cannot be empty".to_string(),
            ))
        } else {
            match self.deadline {
                Some(deadline) => tokio::time::timeout(deadline, self.extractor.extract(text))
                    .await
                    .unwrap_or_else(|_| Err(ExtractionError::timeout(deadline))),
                None => self.extractor.extract(text).await,
            }
        };

        let elapsed = started.elapsed();
        match &outcome {
            Ok(resume) => self.observer.record(ExtractionEvent::GatewaySucceeded {
                name: resume.name.clone(),
                elapsed,
            }),
            Err(error) => self.observer.record(ExtractionEvent::GatewayFailed {
                error: error.clone(),
                elapsed,
            }),
        }
        outcome
    }
}
