//! User Error Types
//!
//! This module provides user-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use kernel::error::code::ErrorCode;
use kernel::response::{self, INTERNAL_ERROR_MESSAGE};
use kernel::validation::engine::ValidateError;
use platform::password::PasswordHashError;
use thiserror::Error;

/// User-specific result type alias
pub type UserResult<T> = Result<T, UserError>;

/// User-specific error variants
#[derive(Debug, Error)]
pub enum UserError {
    /// Request body could not be decoded
    #[error("Invalid request body")]
    MalformedBody(#[source] JsonRejection),

    /// Query string could not be decoded
    #[error("Invalid query parameters")]
    MalformedQuery(#[source] QueryRejection),

    /// Request fields broke validation rules
    #[error(transparent)]
    Invalid(#[from] ValidateError),

    /// Email already registered
    #[error("Email already registered")]
    EmailTaken,

    /// Username already registered
    #[error("Username already taken")]
    UsernameTaken,

    /// Password could not be hashed
    #[error("Password hashing failed")]
    PasswordHash(#[from] PasswordHashError),

    /// Raw database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository failure during a named operation ("create user", ...)
    #[error("Failed to {action}")]
    Persist {
        action: &'static str,
        #[source]
        source: Box<UserError>,
    },
}

impl UserError {
    /// Wraps storage failures under `action`; domain conflicts pass through.
    pub fn persist(action: &'static str) -> impl FnOnce(UserError) -> UserError {
        move |err| match err {
            UserError::Database(_) => UserError::Persist {
                action,
                source: Box::new(err),
            },
            other => other,
        }
    }

    /// Convert to AppError, keeping `self` as the cause where it matters
    pub fn into_app_error(self) -> AppError {
        match self {
            UserError::MalformedBody(rejection) => {
                AppError::wrap(rejection, ErrorCode::Validation, "Invalid request body")
            }
            UserError::MalformedQuery(rejection) => {
                AppError::wrap(rejection, ErrorCode::Validation, "Invalid query parameters")
            }
            UserError::Invalid(err) => err.into(),
            UserError::EmailTaken => AppError::already_exists("Email already registered"),
            UserError::UsernameTaken => AppError::already_exists("Username already taken"),
            UserError::PasswordHash(err) => {
                AppError::wrap(err, ErrorCode::Internal, INTERNAL_ERROR_MESSAGE)
            }
            UserError::Database(err) => err.into(),
            UserError::Persist { action, source } => {
                AppError::wrapf(source, ErrorCode::Database, format_args!("Failed to {action}"))
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            UserError::EmailTaken | UserError::UsernameTaken => {
                tracing::info!(error = %self, "Registration conflict");
            }
            UserError::PasswordHash(e) => {
                tracing::error!(error = %e, "Password hashing failed");
            }
            // Everything else is logged once when the envelope is rendered
            _ => {}
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        err.into_app_error()
    }
}

impl From<JsonRejection> for UserError {
    fn from(rejection: JsonRejection) -> Self {
        UserError::MalformedBody(rejection)
    }
}

impl From<QueryRejection> for UserError {
    fn from(rejection: QueryRejection) -> Self {
        UserError::MalformedQuery(rejection)
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        self.log();
        response::error(self.into_app_error()).into_response()
    }
}
