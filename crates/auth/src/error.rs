//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. User-visible text lives in the
//! variant messages; backend payloads and transport detail stay in
//! internal fields and are only ever logged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Session cookie missing, unverifiable, or record expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Bearer call rejected by the backend (expired access token)
    #[error("Access token expired or rejected")]
    AccessExpired,

    /// Refresh exchange failed (missing cookie or backend denial)
    #[error("Could not refresh the session")]
    RefreshFailed,

    /// Backend reported `success:false`; the message is user-displayable
    #[error("{0}")]
    Rejected(String),

    /// Backend did not answer within the bounded timeout
    #[error("The server took too long to respond")]
    Timeout,

    /// Backend unreachable or returned a malformed response
    #[error("Unable to reach the server")]
    Backend(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::SessionInvalid | AuthError::AccessExpired | AuthError::RefreshFailed => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AuthError::Backend(_) => StatusCode::BAD_GATEWAY,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::SessionInvalid | AuthError::AccessExpired | AuthError::RefreshFailed => {
                ErrorKind::Unauthorized
            }
            AuthError::Rejected(_) => ErrorKind::UnprocessableEntity,
            AuthError::Timeout => ErrorKind::RequestTimeout,
            AuthError::Backend(_) => ErrorKind::BadGateway,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// User-facing message. Transport detail in `Backend` is replaced by a
    /// generic phrase.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Backend(_) => "Unable to reach the server. Please try again.".to_string(),
            other => other.to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.user_message())
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::Backend(detail) => {
                tracing::error!(detail = %detail, "Backend call failed");
            }
            AuthError::Timeout => {
                tracing::warn!("Backend call timed out");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AuthError::Timeout
        } else {
            // Keep the detail for logs; the user sees a generic message
            AuthError::Backend(err.to_string())
        }
    }
}
