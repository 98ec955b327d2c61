//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`. Each variant maps to a distinct client-visible
//! status; internal storage and gateway errors are never leaked verbatim.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;
use crate::services::payments::PaymentError;
use crate::services::permissions::PermissionError;
use crate::services::token::TokenError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// A request field is missing or invalid.
    #[error("{0}")]
    Validation(String),

    /// The session is missing, invalid, or expired.
    #[error("{0}")]
    Authentication(String),

    /// The role/ownership check failed.
    #[error("{0}")]
    Authorization(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness constraint was violated (duplicate email or review).
    #[error("{0}")]
    Conflict(String),

    /// The payment gateway failed; an external dependency problem, not bad
    /// input.
    #[error("payment gateway error: {0}")]
    Gateway(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(RepositoryError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::NotFound => Self::NotFound("Resource not found".to_owned()),
            other => Self::Database(other),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidEmail(e) => Self::Validation(e.to_string()),
            AuthError::Validation(msg) | AuthError::WeakPassword(msg) => Self::Validation(msg),
            AuthError::InvalidCredentials => {
                Self::Authentication("Invalid Credentials".to_owned())
            }
            AuthError::EmailTaken => Self::Conflict("Email already exists".to_owned()),
            AuthError::UserNotFound => Self::NotFound("User not found".to_owned()),
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_owned()),
            AuthError::Repository(e) => e.into(),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => Self::Authentication("Authentication Invalid".to_owned()),
            TokenError::Signing(e) => Self::Internal(format!("token signing failed: {e}")),
        }
    }
}

impl From<PermissionError> for AppError {
    fn from(err: PermissionError) -> Self {
        Self::Authorization(err.to_string())
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart
            | CheckoutError::MissingCharges
            | CheckoutError::InvalidQuantity
            | CheckoutError::AmountNotRepresentable => Self::Validation(err.to_string()),
            CheckoutError::ProductNotFound(_) => Self::NotFound(err.to_string()),
            CheckoutError::Gateway(e) => Self::Gateway(e.to_string()),
            CheckoutError::OrphanedIntent { .. } => {
                // Details were already logged for reconciliation.
                Self::Internal(err.to_string())
            }
            CheckoutError::Repository(e) => e.into(),
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        Self::Gateway(err.to_string())
    }
}

impl AppError {
    /// The client-visible status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Gateway(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-class errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_) | Self::Gateway(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status_code();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::Gateway(_) => "Payment gateway error".to_owned(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "msg": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use oakline_core::ProductId;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Authentication("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Authorization("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Gateway("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_duplicate_review_conflict_maps_to_409() {
        let err: AppError =
            RepositoryError::Conflict("Already submitted review for this product".to_owned())
                .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_gateway_failure_distinct_from_validation() {
        let err: AppError = CheckoutError::Gateway(PaymentError::Api {
            status: 500,
            message: "boom".to_owned(),
        })
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

        let err: AppError = CheckoutError::MissingCharges.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_product_names_the_id() {
        let err: AppError = CheckoutError::ProductNotFound(ProductId::new(42)).into();
        assert_eq!(err.to_string(), "No product with id : 42");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
