/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`; failures render as the standard envelope
/// `{ "success": false, "error": "..." }` with a matching status code.
///
/// # Example
///
/// ```
/// use taskflow_api::error::{ApiError, ApiResult};
///
/// fn find(found: bool) -> ApiResult<&'static str> {
///     if found {
///         Ok("task")
///     } else {
///         Err(ApiError::NotFound("Task not found".to_string()))
///     }
/// }
/// # assert!(find(false).is_err());
/// ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use taskflow_shared::error::ServiceError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Message returned in place of internal failure detail
pub const SERVER_ERROR: &str = "Server Error";

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Validation failures and duplicates (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing session or insufficient role (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Entity absent (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unexpected failure (500); the detail is logged, never returned
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Failure envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_string())
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error: message,
        });

        (status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        tracing::debug!(kind = err.kind(), error = %err, "Request failed");

        match err {
            ServiceError::Validation(msg)
            | ServiceError::Conflict(msg)
            | ServiceError::DuplicateMember(msg) => ApiError::BadRequest(msg),
            ServiceError::Unauthenticated(msg) | ServiceError::Unauthorized(msg) => {
                ApiError::Unauthorized(msg)
            }
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Malformed bodies, wrong content type and unknown enum values
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_service_error_mapping() {
        let status = |err: ServiceError| ApiError::from(err).into_response().status();

        assert_eq!(status(ServiceError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(ServiceError::Conflict("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(ServiceError::DuplicateMember("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(ServiceError::Unauthenticated("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(status(ServiceError::Unauthorized("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(status(ServiceError::not_found("Task")), StatusCode::NOT_FOUND);
        assert_eq!(
            status(ServiceError::Internal("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_detail_is_hidden() {
        let response = ApiError::InternalError("connection refused".to_string()).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], SERVER_ERROR);
    }
}
