//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return `Result<T, AppError>`.
//!
//! Error bodies are JSON: `{"detail": "<message>"}`.

use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::models::ShopDraftError;
use crate::services::auth::AuthError;
use crate::services::shops::ShopError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Shop operation failed.
    #[error("Shop error: {0}")]
    Shop(#[from] ShopError),

    /// Request payload or parameters are invalid.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::Unauthenticated => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::VendorAlreadyExists => StatusCode::BAD_REQUEST,
                AuthError::InvalidEmail(_) | AuthError::Validation(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::Token(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Shop(err) => match err {
                ShopError::NotFound => StatusCode::NOT_FOUND,
                ShopError::Forbidden => StatusCode::FORBIDDEN,
                ShopError::InvalidRadius => StatusCode::UNPROCESSABLE_ENTITY,
                ShopError::Vanished(_) | ShopError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Message safe to show the client.
    fn detail(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Incorrect email or password".to_string(),
                AuthError::Unauthenticated => "Could not validate credentials".to_string(),
                AuthError::VendorAlreadyExists => "Email already registered".to_string(),
                AuthError::InvalidEmail(e) => format!("Invalid email address: {e}"),
                AuthError::Validation(msg) => msg.clone(),
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::Token(_) => {
                    "Internal server error".to_string()
                }
            },
            Self::Shop(err) => match err {
                ShopError::NotFound => "Shop not found".to_string(),
                ShopError::Forbidden => "Not authorized to modify this shop".to_string(),
                ShopError::InvalidRadius => err.to_string(),
                ShopError::Vanished(_) | ShopError::Repository(_) => {
                    "Internal server error".to_string()
                }
            },
            Self::Validation(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let mut response = (status, Json(json!({ "detail": self.detail() }))).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<ShopDraftError> for AppError {
    fn from(err: ShopDraftError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a vendor ID.
///
/// Call this after successful authentication to associate errors with vendors.
pub fn set_sentry_user(vendor_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(vendor_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}
