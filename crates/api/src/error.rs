//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`.
//!
//! Internal error detail is kept out of response bodies unless the
//! debug-errors flag was enabled at startup via [`set_debug_errors`].

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use orbit_market_core::{IdError, PeriodError};

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::catalog::CatalogError;
use crate::services::email::EmailError;
use crate::services::reporting::ReportingError;

/// Whether 500 bodies carry the underlying error message.
static DEBUG_ERRORS: AtomicBool = AtomicBool::new(false);

/// Enable or disable error detail in 500 response bodies.
///
/// Called once at startup from configuration; default is off.
pub fn set_debug_errors(enabled: bool) {
    DEBUG_ERRORS.store(enabled, Ordering::Relaxed);
}

fn debug_errors() -> bool {
    DEBUG_ERRORS.load(Ordering::Relaxed)
}

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Reporting operation failed.
    #[error("Reporting error: {0}")]
    Reporting(#[from] ReportingError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Email delivery failed.
    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    /// Malformed entity id in the request path.
    #[error("Bad id: {0}")]
    InvalidId(#[from] IdError),

    /// Unknown sales period token.
    #[error("Bad period: {0}")]
    InvalidPeriod(#[from] PeriodError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Duplicate resource.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(err) => match err {
                AuthError::SellerNotFound => StatusCode::NOT_FOUND,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::SellerAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Reporting(err) => match err {
                ReportingError::SellerNotFound | ReportingError::NoProducts => {
                    StatusCode::NOT_FOUND
                }
                ReportingError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Catalog(err) => match err {
                CatalogError::ProductNotFound | CatalogError::SellerNotFound => {
                    StatusCode::NOT_FOUND
                }
                CatalogError::Upload(_) | CatalogError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Email(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidId(_) | Self::InvalidPeriod(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    /// The client-facing message. Server-side failures collapse to a generic
    /// message unless debug-errors is on.
    fn client_message(&self) -> String {
        if self.status() == StatusCode::INTERNAL_SERVER_ERROR && !debug_errors() {
            return "Internal server error".to_owned();
        }

        match self {
            Self::Auth(err) => err.to_string(),
            Self::Reporting(err) => err.to_string(),
            Self::Catalog(err) => err.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.status() == StatusCode::INTERNAL_SERVER_ERROR {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = json!({ "error": self.client_message() });
        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_owned());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_owned());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Conflict("test".to_owned())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_taxonomy_mapping() {
        // InvalidArgument (bad period token) -> 400
        assert_eq!(
            get_status(AppError::InvalidPeriod(PeriodError::Invalid(
                "quarter".to_owned()
            ))),
            StatusCode::BAD_REQUEST
        );
        // NotFound kinds -> 404
        assert_eq!(
            get_status(AppError::Reporting(ReportingError::NoProducts)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Catalog(CatalogError::ProductNotFound)),
            StatusCode::NOT_FOUND
        );
        // Conflict (duplicate registration) -> 409
        assert_eq!(
            get_status(AppError::Auth(AuthError::SellerAlreadyExists)),
            StatusCode::CONFLICT
        );
        // Unauthorized (bad credentials) -> 401, unknown email -> 404
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::SellerNotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_detail_hidden_by_default() {
        let err = AppError::Internal("connection pool exhausted".to_owned());
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_client_kinds_keep_their_message() {
        let err = AppError::NotFound("seller".to_owned());
        assert_eq!(err.client_message(), "Not found: seller");
    }
}
