//! Error conversions - From implementations for common error types
//!
//! Every conversion keeps the original error as the cause and uses a fixed,
//! client-safe message.

use super::app_error::AppError;
use super::code::ErrorCode;

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::Forbidden,
            std::io::ErrorKind::TimedOut => ErrorCode::Timeout,
            _ => ErrorCode::Internal,
        };
        AppError::wrap(err, code, "I/O operation failed")
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::wrap(err, ErrorCode::Validation, "Invalid request body")
        } else {
            AppError::wrap(err, ErrorCode::Internal, "JSON serialization error")
        }
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::wrap(err, ErrorCode::NotFound, "Record not found"),
            sqlx::Error::PoolTimedOut => {
                AppError::wrap(err, ErrorCode::Timeout, "Database connection pool exhausted")
            }
            sqlx::Error::Database(db_err) => {
                // PostgreSQL error codes
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                let (code, message) = match db_err.code().as_deref() {
                    Some("23505") => (ErrorCode::AlreadyExists, "Duplicate key value"),
                    Some("23503") => (ErrorCode::AlreadyExists, "Foreign key violation"),
                    Some("23502") | Some("23514") => {
                        (ErrorCode::Validation, "Constraint violation")
                    }
                    Some("42501") => (ErrorCode::Forbidden, "Insufficient privilege"),
                    Some("57014") => (ErrorCode::Timeout, "Query cancelled"),
                    _ => (ErrorCode::Database, "Database error"),
                };
                AppError::wrap(err, code, message)
            }
            _ => AppError::wrap(err, ErrorCode::Database, "Database error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.code(), ErrorCode::NotFound);
        assert!(app_err.source().is_some());

        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.code(), ErrorCode::Timeout);
    }

    #[test]
    fn test_json_error_conversion_hides_parser_text() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.code(), ErrorCode::Validation);
        assert_eq!(app_err.message(), "Invalid request body");
        assert!(app_err.details().is_none());
    }
}
