use crate::extraction::gateway::ResumeExtractionGateway;
use crate::extraction::view_model::ViewModelHandle;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Serves `POST /api/v1/extract` for callers on the other side of the boundary.
    pub gateway: ResumeExtractionGateway,
    /// The page's view model. One per process: this app has no per-user state.
    pub view_model: ViewModelHandle,
}
