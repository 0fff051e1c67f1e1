//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`] struct, [`AppResult<T>`] type alias and the
//! cause-chain helpers ([`is_error_code`], [`find_app_error`]).

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::code::ErrorCode;

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// アプリケーション統一エラー型
///
/// ## Fields
/// * `code` - 記号コード（HTTP ステータスコードは常にここから導出される）
/// * `message` - クライアントに返してよいメッセージ
/// * `details` - 任意の補足情報（呼び出し側が明示的に設定した場合のみ）
/// * `source` - 元のエラー（このインスタンスが排他的に所有する）
///
/// The status code has no setter: it is always `code.status_code()`.
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, code::ErrorCode};
///
/// let err = AppError::new(ErrorCode::NotFound, "User not found");
/// assert_eq!(err.status_code(), 404);
///
/// let io = std::io::Error::other("connection reset");
/// let err = AppError::wrap(io, ErrorCode::Database, "Failed to create user");
/// assert_eq!(err.status_code(), 500);
/// ```
pub struct AppError {
    code: ErrorCode,
    message: Cow<'static, str>,
    details: Option<Cow<'static, str>>,
    source: Option<BoxError>,
}

/// アプリケーション結果型エイリアス
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// 新しいエラーを作成（原因なし）
    #[inline]
    pub fn new(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// 元のエラーをラップして作成
    ///
    /// The cause is kept for logging and chain inspection only; it never
    /// becomes part of `message` or `details`.
    #[inline]
    pub fn wrap<E>(source: E, code: ErrorCode, message: impl Into<Cow<'static, str>>) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            code,
            message: message.into(),
            details: None,
            source: Some(source.into()),
        }
    }

    /// [`wrap`](Self::wrap) with a formatted message.
    ///
    /// ```rust
    /// use kernel::error::{app_error::AppError, code::ErrorCode};
    ///
    /// let io = std::io::Error::other("refused");
    /// let err = AppError::wrapf(io, ErrorCode::ExternalService, format_args!("{} unreachable", "mailer"));
    /// assert_eq!(err.message(), "mailer unreachable");
    /// ```
    #[inline]
    pub fn wrapf<E>(source: E, code: ErrorCode, args: fmt::Arguments<'_>) -> Self
    where
        E: Into<BoxError>,
    {
        Self::wrap(source, code, args.to_string())
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    /// 400 VALIDATION_ERROR
    #[inline]
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// 404 NOT_FOUND
    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// 409 ALREADY_EXISTS
    #[inline]
    pub fn already_exists(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::AlreadyExists, message)
    }

    /// 401 UNAUTHORIZED
    #[inline]
    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// 403 FORBIDDEN
    #[inline]
    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// 500 INTERNAL_ERROR
    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// 補足情報を設定
    ///
    /// Only callers set details. Never pass a lower-level error string here
    /// unless it is meant to reach the client.
    #[inline]
    pub fn with_details(mut self, details: impl Into<Cow<'static, str>>) -> Self {
        self.details = Some(details.into());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// HTTP ステータスコードを取得
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.code.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// The wrapped cause, if any.
    #[inline]
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Takes the wrapped cause out, leaving the error without one.
    #[inline]
    pub fn into_cause(self) -> Option<BoxError> {
        self.source
    }

    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.code.is_server_error()
    }

    #[inline]
    pub fn is_client_error(&self) -> bool {
        self.code.is_client_error()
    }

    /// Renders the whole cause chain for logs, outermost first.
    pub fn chain_to_string(&self) -> String {
        let mut out = self.to_string();
        let mut current = self.source();
        while let Some(err) = current {
            out.push_str(" <- ");
            out.push_str(&err.to_string());
            current = err.source();
        }
        out
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("code", &self.code);
        builder.field("message", &self.message);
        if let Some(details) = &self.details {
            builder.field("details", details);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(source) = &self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

// ============================================================================
// Chain inspection
// ============================================================================

/// Returns the first [`AppError`] in `err`'s cause chain, `err` included.
pub fn find_app_error<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a AppError> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(app) = e.downcast_ref::<AppError>() {
            return Some(app);
        }
        current = e.source();
    }
    None
}

/// Reports whether any [`AppError`] in `err`'s cause chain carries `code`.
///
/// Matching is by code only; messages are never compared.
///
/// ```rust
/// use kernel::error::app_error::{AppError, is_error_code};
/// use kernel::error::code::ErrorCode;
///
/// let inner = AppError::not_found("missing");
/// let outer = AppError::wrap(inner, ErrorCode::Internal, "lookup failed");
/// assert!(is_error_code(&outer, ErrorCode::NotFound));
/// assert!(is_error_code(&outer, ErrorCode::Internal));
/// assert!(!is_error_code(&outer, ErrorCode::Forbidden));
/// ```
pub fn is_error_code(err: &(dyn Error + 'static), code: ErrorCode) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.downcast_ref::<AppError>().is_some_and(|app| app.code == code) {
            return true;
        }
        current = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("disk on fire")]
    struct DiskError;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorCode::NotFound, "User not found");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "User not found");
        assert!(err.details().is_none());
        assert!(err.source().is_none());
    }

    #[test]
    fn test_status_follows_code() {
        for code in ErrorCode::ALL {
            assert_eq!(AppError::new(code, "x").status_code(), code.status_code());
        }
    }

    #[test]
    fn test_wrap_preserves_cause_identity() {
        let err = AppError::wrap(DiskError, ErrorCode::Database, "x");
        let cause = err.source().expect("cause");
        assert!(cause.downcast_ref::<DiskError>().is_some());
        assert!(std::ptr::eq(
            cause as *const dyn Error as *const (),
            err.cause().unwrap() as *const (dyn Error + Send + Sync) as *const (),
        ));

        let boxed = err.into_cause().expect("cause");
        assert!(boxed.downcast::<DiskError>().is_ok());
    }

    #[test]
    fn test_wrap_never_fills_details() {
        let err = AppError::wrap(DiskError, ErrorCode::Database, "Failed to save");
        assert!(err.details().is_none());
        assert_eq!(err.message(), "Failed to save");
    }

    #[test]
    fn test_wrapf() {
        let err = AppError::wrapf(
            DiskError,
            ErrorCode::Timeout,
            format_args!("query took {}ms", 3000),
        );
        assert_eq!(err.message(), "query took 3000ms");
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_is_error_code_walks_chain() {
        let err = AppError::wrap(DiskError, ErrorCode::Database, "x");
        assert!(is_error_code(&err, ErrorCode::Database));
        for code in ErrorCode::ALL.into_iter().filter(|c| *c != ErrorCode::Database) {
            assert!(!is_error_code(&err, code));
        }

        let outer = AppError::wrap(err, ErrorCode::Internal, "outer");
        assert!(is_error_code(&outer, ErrorCode::Database));
        assert!(is_error_code(&outer, ErrorCode::Internal));
        assert!(!is_error_code(&DiskError, ErrorCode::Internal));
    }

    #[test]
    fn test_is_error_code_ignores_message() {
        let err = AppError::new(ErrorCode::Validation, "NOT_FOUND");
        assert!(!is_error_code(&err, ErrorCode::NotFound));
    }

    #[test]
    fn test_find_app_error_through_foreign_wrapper() {
        #[derive(Debug, thiserror::Error)]
        #[error("handler failed")]
        struct Outer(#[source] AppError);

        let err = Outer(AppError::forbidden("nope"));
        let found = find_app_error(&err).expect("app error in chain");
        assert_eq!(found.code(), ErrorCode::Forbidden);
    }

    #[test]
    fn test_display() {
        let err = AppError::not_found("User not found");
        assert_eq!(err.to_string(), "NOT_FOUND: User not found");

        let err = AppError::wrap(DiskError, ErrorCode::Database, "Failed");
        assert_eq!(err.to_string(), "DATABASE_ERROR: Failed (caused by: disk on fire)");
        assert_eq!(
            err.chain_to_string(),
            "DATABASE_ERROR: Failed (caused by: disk on fire) <- disk on fire"
        );
    }
}
