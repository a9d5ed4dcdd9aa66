use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use poselab_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `poselab_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Classify a [`CoreError`] into an HTTP status, error code, and message.
///
/// Shared between the response mapping below and the per-element error
/// markers in batch results.
pub fn core_error_parts(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::InvalidVideoFormat(msg) => (
            StatusCode::BAD_REQUEST,
            "INVALID_VIDEO_FORMAT",
            msg.clone(),
        ),
        CoreError::AssetNotFound { filename } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Video '{filename}' not found"),
        ),
        CoreError::FrameIndexOutOfRange { index, frame_count } => (
            StatusCode::BAD_REQUEST,
            "FRAME_INDEX_OUT_OF_RANGE",
            format!("Frame index {index} out of range (valid range: 0..{frame_count})"),
        ),
        CoreError::AnalysisFailed(cause) => (
            StatusCode::BAD_GATEWAY,
            "ANALYSIS_FAILED",
            format!("Pose analysis failed: {cause}"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => core_error_parts(core),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
