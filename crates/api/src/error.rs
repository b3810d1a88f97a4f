//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use pgtracker_core::Error as CoreError;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Core(err) => match err {
                CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                CoreError::CapacityExceeded(msg) | CoreError::InvalidArgument(msg) => {
                    (StatusCode::BAD_REQUEST, msg.clone())
                }
                CoreError::PermissionDenied(msg) => (StatusCode::FORBIDDEN, msg.clone()),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                // Store/internal failures surface as a generic message;
                // the detail stays in the server log
                CoreError::Database(_) | CoreError::Io(_) | CoreError::Serialization(_) => {
                    tracing::error!(error = %err, "Internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_taxonomy_mapping() {
        assert_eq!(
            status_of(CoreError::NotFound("room 101".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CoreError::CapacityExceeded("full".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoreError::InvalidArgument("bad amount".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoreError::PermissionDenied("no".into()).into()),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(CoreError::Conflict("occupied".into()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApiError::Unauthorized("missing header".into())),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_internal_errors_are_generic() {
        let err: ApiError = CoreError::Io(std::io::Error::other("store unreachable")).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
