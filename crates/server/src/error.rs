//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`. Error bodies are JSON: `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::lulu::LuluError;
use crate::services::auth::AuthError;
use crate::stripe::StripeError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Stripe API operation failed.
    #[error("Stripe error: {0}")]
    Stripe(#[from] StripeError),

    /// Lulu API operation failed.
    #[error("Lulu error: {0}")]
    Lulu(#[from] LuluError),

    /// Admin authentication failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Client sent an invalid payload.
    #[error("Validation: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource exists but may no longer be used.
    #[error("Gone: {0}")]
    Gone(String),

    /// Caller may not perform this action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Stripe(_) | Self::Lulu(_) => StatusCode::BAD_GATEWAY,
            Self::Auth(err) => err.status(),
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Gone(_) => StatusCode::GONE,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internals are never exposed.
    fn message(&self) -> String {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => "Not found".to_owned(),
                RepositoryError::Conflict(msg) => msg.clone(),
                _ => "Internal server error".to_owned(),
            },
            Self::Stripe(_) | Self::Lulu(_) => "External service error".to_owned(),
            Self::Auth(err) => err.public_message().to_owned(),
            Self::Internal(_) => "Internal server error".to_owned(),
            Self::Unauthorized => "Unauthorized".to_owned(),
            Self::Validation(msg) | Self::NotFound(msg) | Self::Gone(msg) | Self::Forbidden(msg) => {
                msg.clone()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side failures to Sentry
        if self.status().is_server_error() || matches!(self, Self::Stripe(_) | Self::Lulu(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = serde_json::json!({ "error": self.message() });
        (self.status(), Json(body)).into_response()
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
    fn test_status_mapping() {
        assert_eq!(
            status_of(AppError::Validation("bad".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AppError::Forbidden("limit".to_owned())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(AppError::NotFound("token".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(AppError::Gone("expired".to_owned())), StatusCode::GONE);
        assert_eq!(
            status_of(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_error_mapping() {
        assert_eq!(
            status_of(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Database(RepositoryError::Conflict(
                "email already exists".to_owned()
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Database(RepositoryError::DataCorruption(
                "bad".to_owned()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_vendor_errors_map_to_bad_gateway() {
        assert_eq!(
            status_of(AppError::Stripe(StripeError::Api {
                status: 400,
                message: "nope".to_owned()
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(AppError::Lulu(LuluError::Api {
                status: 500,
                message: "nope".to_owned()
            })),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let err = AppError::Internal("connection string postgres://user:pw@host".to_owned());
        assert_eq!(err.message(), "Internal server error");
    }
}
