use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ndaq_client::NdaqError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Generation-pipeline failures answer with `{success: false, message}`;
/// download-proxy failures answer with `{error, message}`. Both are part of
/// the caller-facing contract, so the shapes differ per variant.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Unexpected upstream response: {0}")]
    UpstreamProtocol(String),

    #[error("Document generation failed")]
    GenerationFailed,

    #[error("Timeout waiting for document completion")]
    GenerationTimeout,

    #[error("Failed to download document: {0}")]
    Download(String),
}

impl From<NdaqError> for AppError {
    fn from(err: NdaqError) -> Self {
        match err {
            NdaqError::Http(e) => AppError::UpstreamUnavailable(e.to_string()),
            NdaqError::Api { status, message } => {
                AppError::UpstreamUnavailable(format!("upstream returned {status}: {message}"))
            }
            NdaqError::Protocol(msg) => AppError::UpstreamProtocol(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "message": msg }),
            ),
            AppError::UpstreamUnavailable(msg) => {
                tracing::error!("Upstream unavailable: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "message": "Document service is unavailable" }),
                )
            }
            AppError::UpstreamProtocol(msg) => {
                tracing::error!("Upstream protocol error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "message": "Invalid response from NDAQ API" }),
                )
            }
            AppError::GenerationFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "success": false, "message": "Document generation failed" }),
            ),
            AppError::GenerationTimeout => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "success": false, "message": "Timeout waiting for document completion" }),
            ),
            AppError::Download(msg) => {
                tracing::error!("Download proxy error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to download document", "message": msg }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
