use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use filecms_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Handlers recover the expected domain errors themselves (flash redirects,
/// re-rendered forms); whatever reaches [`IntoResponse`] becomes a JSON error
/// response.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `filecms_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A session cookie could not be signed.
    #[error("Session error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string())
                }
                CoreError::InvalidName
                | CoreError::InvalidUsername
                | CoreError::DuplicateUsername
                | CoreError::InvalidPassword => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_ERROR",
                    core.to_string(),
                ),
                CoreError::InvalidImageUrl => (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "INVALID_IMAGE_URL",
                    core.to_string(),
                ),
                CoreError::Credentials(_) | CoreError::Io(_) => {
                    tracing::error!(error = %core, "Internal core error");
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::Session(err) => {
                tracing::error!(error = %err, "Session signing error");
                internal()
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
