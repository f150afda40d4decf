//! Diagnostic events emitted by the gateway and the view model.
//!
//! Both components receive an `Arc<dyn ExtractionObserver>` at construction
//! instead of logging ambiently, so tests can assert on what was reported.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::extraction::error::ExtractionError;
use crate::extraction::view_model::FetchMode;

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionEvent {
    /// The gateway is about to call the extraction capability.
    GatewayStarted { text_len: usize },
    GatewaySucceeded { name: String, elapsed: Duration },
    GatewayFailed {
        error: ExtractionError,
        elapsed: Duration,
    },
    InputChanged { text_len: usize },
    RefetchStarted { generation: u64, mode: FetchMode },
    /// A computation's outcome was written to the resource slot.
    Committed { generation: u64, ready: bool },
    /// A computation finished after a newer one had started.
    Discarded { generation: u64, latest: u64 },
}

pub trait ExtractionObserver: Send + Sync {
    fn record(&self, event: ExtractionEvent);
}

/// Production observer: forwards every event to `tracing`.
pub struct TracingObserver;

impl ExtractionObserver for TracingObserver {
    fn record(&self, event: ExtractionEvent) {
        match event {
            ExtractionEvent::GatewayStarted { text_len } => {
                info!(text_len, "Attempting to extract resume")
            }
            ExtractionEvent::GatewaySucceeded { name, elapsed } => {
                info!(%name, elapsed_ms = elapsed.as_millis() as u64, "Resume extraction successful")
            }
            ExtractionEvent::GatewayFailed { error, elapsed } => warn!(
                kind = error.code(),
                backend = error.is_backend(),
                error = %error,
                elapsed_ms = elapsed.as_millis() as u64,
                "Resume extraction failed"
            ),
            ExtractionEvent::InputChanged { text_len } => debug!(text_len, "Input text changed"),
            ExtractionEvent::RefetchStarted { generation, mode } => {
                info!(generation, mode = mode.label(), "Refetch started")
            }
            ExtractionEvent::Committed { generation, ready } => {
                debug!(generation, ready, "Resource committed")
            }
            ExtractionEvent::Discarded { generation, latest } => {
                debug!(generation, latest, "Discarded superseded result")
            }
        }
    }
}
