//! Unified error handling with Sentry integration.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::backend::AdminBackendError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API operation failed.
    #[error("Backend error: {0}")]
    Backend(#[from] AdminBackendError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Admin is not authenticated or not privileged.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side failures to Sentry
        if matches!(
            self,
            Self::Internal(_)
                | Self::Backend(AdminBackendError::Http(_) | AdminBackendError::Failure { .. })
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Backend(err) => match err {
                AdminBackendError::Unauthorized => StatusCode::UNAUTHORIZED,
                AdminBackendError::NotFound(_) => StatusCode::NOT_FOUND,
                AdminBackendError::Rejected { .. } => StatusCode::BAD_REQUEST,
                AdminBackendError::Http(_)
                | AdminBackendError::Failure { .. }
                | AdminBackendError::Parse(_) => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let detail = match &self {
            Self::Backend(err) => match err {
                AdminBackendError::Unauthorized => {
                    "Your session has expired. Please log in again.".to_owned()
                }
                AdminBackendError::NotFound(msg) => msg.clone(),
                AdminBackendError::Rejected { detail, .. } => detail.clone(),
                AdminBackendError::Http(_)
                | AdminBackendError::Failure { .. }
                | AdminBackendError::Parse(_) => "External service error".to_owned(),
            },
            Self::Internal(_) => "Internal server error".to_owned(),
            Self::Unauthorized(msg) => msg.clone(),
            _ => self.to_string(),
        };

        let body = if status == StatusCode::UNAUTHORIZED {
            // Global session-reset policy: point the client back at login
            serde_json::json!({ "detail": detail, "redirect": "/auth/login" })
        } else {
            serde_json::json!({ "detail": detail })
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_backend_401_maps_to_unauthorized() {
        assert_eq!(
            status_of(AppError::Backend(AdminBackendError::Unauthorized)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_backend_rejection_maps_to_bad_request() {
        assert_eq!(
            status_of(AppError::Backend(AdminBackendError::Rejected {
                status: 400,
                detail: "Slug already exists".to_owned(),
            })),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_backend_failure_maps_to_bad_gateway() {
        assert_eq!(
            status_of(AppError::Backend(AdminBackendError::Failure {
                status: 500,
                detail: "boom".to_owned(),
            })),
            StatusCode::BAD_GATEWAY
        );
    }
}
