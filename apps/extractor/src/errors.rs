use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::error::ExtractionError;
use crate::extraction::view_model::ViewModelError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Carried to the caller with its message untouched: the boundary
    /// transport rebuilds the same error from `code` and `message`.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("View model error: {0}")]
    ViewModel(#[from] ViewModelError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Extraction(e) => {
                tracing::warn!("Extraction error: {e}");
                let status = match e {
                    ExtractionError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                    ExtractionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, e.code(), e.message().to_string())
            }
            AppError::ViewModel(e) => {
                tracing::error!("View model error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "VIEW_MODEL_UNAVAILABLE",
                    "The extraction view model is not running".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_extraction_error_keeps_message_verbatim() {
        let response =
            AppError::from(ExtractionError::Transport("network down".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "TRANSPORT_ERROR");
        assert_eq!(body["error"]["message"], "network down");
    }

    #[tokio::test]
    async fn test_timeout_maps_to_gateway_timeout() {
        let response =
            AppError::from(ExtractionError::Timeout("too slow".into())).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body_json(response).await["error"]["code"], "TIMEOUT");
    }

    #[tokio::test]
    async fn test_invalid_input_is_bad_request() {
        let response = AppError::from(ExtractionError::InvalidInput(
            "text cannot be empty".into(),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        assert_eq!(body["error"]["message"], "text cannot be empty");
    }
}
