use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use arbor_social::SocialError;

/// HTTP-facing failure. Core errors keep their message in the JSON body;
/// storage errors are logged and reported as an opaque 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Social(#[from] SocialError),
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Social(e) => social_response(e),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.to_string()),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn social_response(e: SocialError) -> (StatusCode, String) {
    let status = match &e {
        SocialError::NotFound(_) => StatusCode::NOT_FOUND,
        SocialError::Forbidden(_) => StatusCode::FORBIDDEN,
        SocialError::Conflict(_) | SocialError::InvalidState(_) => StatusCode::CONFLICT,
        SocialError::Validation(_) => StatusCode::BAD_REQUEST,
        SocialError::Storage(err) => {
            error!("Storage error: {:#}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            );
        }
    };
    (status, e.to_string())
}

/// Run blocking store work off the async runtime.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, SocialError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}
