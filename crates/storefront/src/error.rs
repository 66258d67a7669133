//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`.
//!
//! Checkout errors are business-rule outcomes, not server faults: they map
//! to 4xx responses and are never sent to Sentry. A failed postal lookup
//! (`LookupFailed`) must stay distinguishable from an incompatible artisan
//! in anything shown to the buyer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use tianguis_core::CheckoutError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A checkout rule rejected the request.
    #[error("checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Session load/store failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Internal(_) | Self::Session(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Checkout(err) => match err {
                // External collaborator failure, retryable by the buyer.
                CheckoutError::LookupFailed(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tianguis_core::LookupFailure;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_checkout_errors_are_unprocessable() {
        let err = AppError::Checkout(CheckoutError::InvalidPostalCode {
            input: "12A45".to_string(),
        });
        assert_eq!(status_of(err), StatusCode::UNPROCESSABLE_ENTITY);

        let err = AppError::Checkout(CheckoutError::NotReady);
        assert_eq!(status_of(err), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_lookup_failure_is_bad_gateway() {
        let err = AppError::Checkout(CheckoutError::LookupFailed(
            LookupFailure::ServiceUnavailable,
        ));
        assert_eq!(status_of(err), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_not_found_and_bad_request() {
        assert_eq!(
            status_of(AppError::NotFound("producto".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::BadRequest("entrada".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_hides_details() {
        let response = AppError::Internal("catalog corrupt".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
