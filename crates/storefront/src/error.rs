//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every response body uses the same envelope: `{ "data": ..., "error": null }`
//! on success ([`Envelope`]) and `{ "data": null, "error": { "message" } }` on
//! failure.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use foodhub_core::checkout::CheckoutError;
use foodhub_core::order::TransitionError;
use foodhub_core::review::ReviewError;
use serde::Serialize;
use thiserror::Error;

use crate::api::ApiError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Marketplace API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The cart cannot be turned into an order.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Order status change refused locally.
    #[error("Transition error: {0}")]
    Transition(#[from] TransitionError),

    /// Review input or gating failure.
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but may not do this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Api(err) => match err {
                ApiError::NotFound(_) => StatusCode::NOT_FOUND,
                ApiError::Remote { status, .. } if status.is_client_error() => *status,
                ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Checkout(CheckoutError::NotAuthenticated) | Self::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Checkout(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Transition(TransitionError::NotPermitted { .. })
            | Self::Review(ReviewError::NotAllowed)
            | Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Transition(_) => StatusCode::CONFLICT,
            Self::Review(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::Checkout(err) => err.to_string(),
            Self::Transition(err) => err.to_string(),
            Self::Review(err) => err.to_string(),
            // Don't expose internal error details to clients
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::BadRequest(msg) => msg.clone(),
        }
    }

    fn is_server_error(&self) -> bool {
        match self {
            Self::Api(err) => {
                err.is_transport()
                    || matches!(err, ApiError::Remote { status, .. } if status.is_server_error())
            }
            Self::Session(_) | Self::Internal(_) => true,
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = FailureBody {
            data: None,
            error: ErrorMessage {
                message: self.client_message(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

// =============================================================================
// Response Envelope
// =============================================================================

/// Successful JSON response: `{ "data": T, "error": null }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
    pub error: Option<ErrorMessage>,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap a payload.
    pub const fn ok(data: T) -> Self {
        Self { data, error: None }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// User-facing error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Serialize)]
struct FailureBody {
    data: Option<()>,
    error: ErrorMessage,
}

// =============================================================================
// Sentry Helpers
// =============================================================================

/// Set the Sentry user context from a user ID.
///
/// Call this after resolving the session to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use foodhub_core::{OrderStatus, Role};

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order o1".to_string());
        assert_eq!(err.to_string(), "Not found: order o1");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::NotAuthenticated)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Transition(TransitionError::NotPermitted {
                role: Role::Customer,
                from: OrderStatus::Preparing,
                to: OrderStatus::Cancelled,
            })),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Transition(TransitionError::Terminal(
                OrderStatus::Delivered
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Api(ApiError::Timeout)),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_remote_client_errors_pass_through() {
        let err = AppError::Api(ApiError::Remote {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Meal is unavailable".to_string(),
        });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.client_message(), "Meal is unavailable");

        let err = AppError::Api(ApiError::Remote {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "down".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::Internal("db password leaked".to_string());
        assert_eq!(err.client_message(), "Internal server error");
        assert_eq!(
            AppError::Api(ApiError::Timeout).client_message(),
            "Something went wrong."
        );
    }

    #[tokio::test]
    async fn test_failure_envelope_shape() {
        let response = AppError::BadRequest("Please provide a delivery address.".to_string())
            .into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data": null,
                "error": { "message": "Please provide a delivery address." }
            })
        );
    }
}
