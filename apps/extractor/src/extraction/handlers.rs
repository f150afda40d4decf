//! Axum route handlers for the Extraction API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::resource::AsyncResource;
use crate::extraction::view_model::{FetchMode, Snapshot};
use crate::models::resume::{ExtractionRequest, Resume};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SetInputRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct RefetchRequest {
    #[serde(default)]
    pub mode: FetchMode,
}

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ResourceResponse {
    pub resource: AsyncResource<Resume>,
    pub loading: bool,
    /// Pending with an older outcome still available in `latest_value`.
    pub stale: bool,
    pub latest_value: Option<Resume>,
    pub error: Option<String>,
}

impl From<AsyncResource<Resume>> for ResourceResponse {
    fn from(resource: AsyncResource<Resume>) -> Self {
        Self {
            loading: resource.is_loading(),
            stale: resource.is_stale(),
            latest_value: resource.latest_value().cloned(),
            error: resource.error().map(|e| e.message().to_string()),
            resource,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/extract
///
/// The boundary RPC: runs the gateway on this server for a remote caller.
/// Extraction errors, input rejection included, are returned with their kind
/// and message intact.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractionRequest>,
) -> Result<Json<Resume>, AppError> {
    let resume = state.gateway.extract_resume(&request.text).await?;
    Ok(Json(resume))
}

/// GET /api/v1/resume
pub async fn handle_get_snapshot(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.view_model.snapshot())
}

/// GET /api/v1/resume/resource
pub async fn handle_get_resource(State(state): State<AppState>) -> Json<ResourceResponse> {
    Json(state.view_model.current_resource().into())
}

/// GET /api/v1/resume/settled
///
/// Long poll: answers once the current extraction, if any, has settled.
pub async fn handle_wait_settled(
    State(state): State<AppState>,
) -> Result<Json<Snapshot>, AppError> {
    let snapshot = state.view_model.settled().await?;
    Ok(Json(snapshot))
}

/// PUT /api/v1/resume/input
///
/// Updates the input text only; extraction waits for an explicit refetch.
pub async fn handle_set_input(
    State(state): State<AppState>,
    Json(request): Json<SetInputRequest>,
) -> Result<Json<Snapshot>, AppError> {
    let snapshot = state.view_model.set_input_text(request.text).await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/resume/refetch
///
/// Starts a new extraction and returns immediately with the pending snapshot.
pub async fn handle_refetch(
    State(state): State<AppState>,
    Json(request): Json<RefetchRequest>,
) -> Result<Json<Snapshot>, AppError> {
    let snapshot = state.view_model.refetch(request.mode).await?;
    Ok(Json(snapshot))
}
