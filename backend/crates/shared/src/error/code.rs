//! Error Code - Symbolic classification of application errors
//!
//! Defines the [`ErrorCode`] enum and the fixed code → HTTP status table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status used for any code that is not in the table.
pub const DEFAULT_STATUS: u16 = 500;

/// Symbolic error codes carried by [`AppError`](super::app_error::AppError).
///
/// Codes are split into two classes:
/// * business-logic codes (client-correctable, 4xx)
/// * system codes (not correctable by the client, 5xx)
///
/// The wire form is `SCREAMING_SNAKE_CASE`, e.g. `"VALIDATION_ERROR"`.
///
/// ## Examples
/// ```rust
/// use kernel::error::code::ErrorCode;
///
/// let code = ErrorCode::NotFound;
/// assert_eq!(code.status_code(), 404);
/// assert_eq!(code.as_str(), "NOT_FOUND");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Business logic
    /// 400 - input failed validation
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    /// 404 - resource does not exist
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    /// 409 - resource conflicts with an existing one
    #[serde(rename = "ALREADY_EXISTS")]
    AlreadyExists,
    /// 401 - authentication required
    #[serde(rename = "UNAUTHORIZED")]
    Unauthorized,
    /// 403 - authenticated but not permitted
    #[serde(rename = "FORBIDDEN")]
    Forbidden,

    // System
    /// 500 - storage layer failure
    #[serde(rename = "DATABASE_ERROR")]
    Database,
    /// 500 - upstream dependency failure
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalService,
    /// 500 - anything else that went wrong on our side
    #[serde(rename = "INTERNAL_ERROR")]
    Internal,
    /// 500 - operation did not complete in time
    #[serde(rename = "TIMEOUT_ERROR")]
    Timeout,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: [ErrorCode; 9] = [
        ErrorCode::Validation,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::Unauthorized,
        ErrorCode::Forbidden,
        ErrorCode::Database,
        ErrorCode::ExternalService,
        ErrorCode::Internal,
        ErrorCode::Timeout,
    ];

    /// HTTP ステータスコードを取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::code::ErrorCode;
    /// assert_eq!(ErrorCode::Validation.status_code(), 400);
    /// assert_eq!(ErrorCode::Timeout.status_code(), 500);
    /// ```
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorCode::Validation => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::AlreadyExists => 409,
            ErrorCode::Unauthorized => 401,
            ErrorCode::Forbidden => 403,
            ErrorCode::Database
            | ErrorCode::ExternalService
            | ErrorCode::Internal
            | ErrorCode::Timeout => 500,
        }
    }

    /// Wire representation of the code.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Validation => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::AlreadyExists => "ALREADY_EXISTS",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::Database => "DATABASE_ERROR",
            ErrorCode::ExternalService => "EXTERNAL_SERVICE_ERROR",
            ErrorCode::Internal => "INTERNAL_ERROR",
            ErrorCode::Timeout => "TIMEOUT_ERROR",
        }
    }

    /// システム系のコードかどうか
    ///
    /// System codes must never expose their cause to the client.
    #[inline]
    pub const fn is_system(&self) -> bool {
        matches!(
            self,
            ErrorCode::Database
                | ErrorCode::ExternalService
                | ErrorCode::Internal
                | ErrorCode::Timeout
        )
    }

    /// サーバー側のエラーかどうか
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// クライアント側のエラーかどうか
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }
}

/// Looks up the status for a wire code string.
///
/// Codes outside the table map to [`DEFAULT_STATUS`].
///
/// ```rust
/// use kernel::error::code::status_for;
/// assert_eq!(status_for("ALREADY_EXISTS"), 409);
/// assert_eq!(status_for("RATE_LIMITED"), 500);
/// ```
pub fn status_for(code: &str) -> u16 {
    code.parse::<ErrorCode>()
        .map(|c| c.status_code())
        .unwrap_or(DEFAULT_STATUS)
}

/// Returned when parsing a code that is not in the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized error code: {0}")]
pub struct UnknownErrorCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownErrorCode(s.to_string()))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
