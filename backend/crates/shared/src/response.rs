//! Response Envelope
//!
//! Every response body has the same shape:
//!
//! ```json
//! { "success": true,  "data": { ... }, "meta": { "page": 1, "per_page": 20, "total": 100, "total_pages": 5 } }
//! { "success": false, "error": { "code": "NOT_FOUND", "message": "User not found", "details": "..." } }
//! ```
//!
//! `meta`, `details` and `fields` are left out when absent. A [`Reply`]
//! pairs the body with its HTTP status; with the `axum` feature it is an
//! `IntoResponse`.

use std::collections::BTreeMap;
use std::error::Error;

use serde::Serialize;

use crate::error::app_error::{AppError, find_app_error};
use crate::error::code::ErrorCode;
use crate::validation::engine::ValidationErrors;

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Message sent for anything that is not an [`AppError`].
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_NO_CONTENT: u16 = 204;

// ============================================================================
// Wire types
// ============================================================================

/// Pagination metadata. Zero members are omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Meta {
    #[serde(skip_serializing_if = "is_zero")]
    pub page: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub per_page: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub total: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub total_pages: u64,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

impl Meta {
    /// Builds pagination metadata, deriving `total_pages`.
    ///
    /// ```rust
    /// use kernel::response::Meta;
    /// let meta = Meta::paginate(1, 20, 100);
    /// assert_eq!(meta.total_pages, 5);
    /// assert_eq!(Meta::paginate(1, 20, 101).total_pages, 6);
    /// ```
    pub fn paginate(page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Error member of a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Per-field messages, only for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorInfo {
    fn from_app_error(err: &AppError) -> Self {
        let fields = match err.code() {
            ErrorCode::Validation => err
                .cause()
                .and_then(|cause| cause.downcast_ref::<ValidationErrors>())
                .map(ValidationErrors::to_map),
            _ => None,
        };
        Self {
            code: err.code(),
            message: err.message().to_string(),
            details: err.details().map(str::to_string),
            fields,
        }
    }

    fn internal() -> Self {
        Self {
            code: ErrorCode::Internal,
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            details: None,
            fields: None,
        }
    }
}

/// The envelope. Exactly one of `data` / `error` is set, matching `success`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<Meta>,
}

impl<T> Response<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
        }
    }

    pub fn success_with_meta(data: T, meta: Meta) -> Self {
        Self {
            meta: Some(meta),
            ..Self::success(data)
        }
    }

    pub fn failure(error: ErrorInfo) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            meta: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }
}

// ============================================================================
// Failure
// ============================================================================

/// Anything an error response can be rendered from.
#[derive(Debug)]
pub enum Failure {
    /// A structured application error
    App(AppError),
    /// Any other error; rendered through the first [`AppError`] in its
    /// chain, or as a generic internal error when there is none
    Opaque(BoxError),
}

impl Failure {
    pub fn opaque(err: impl Into<BoxError>) -> Self {
        Failure::Opaque(err.into())
    }
}

impl From<AppError> for Failure {
    fn from(err: AppError) -> Self {
        Failure::App(err)
    }
}

impl From<BoxError> for Failure {
    fn from(err: BoxError) -> Self {
        Failure::Opaque(err)
    }
}

// ============================================================================
// Reply
// ============================================================================

/// A status plus an optional envelope body (`None` for 204).
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    status: u16,
    body: Option<Response<T>>,
}

impl<T> Reply<T> {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> Option<&Response<T>> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<Response<T>> {
        self.body
    }
}

/// Success envelope with `data`.
pub fn json<T>(status: u16, data: T) -> Reply<T> {
    Reply {
        status,
        body: Some(Response::success(data)),
    }
}

/// Success envelope with `data` and pagination `meta`.
pub fn json_with_meta<T>(status: u16, data: T, meta: Meta) -> Reply<T> {
    Reply {
        status,
        body: Some(Response::success_with_meta(data, meta)),
    }
}

/// Error envelope.
///
/// An [`AppError`], directly or anywhere in an opaque error's chain, is
/// rendered with its own code, message, details and status. Anything else
/// becomes `INTERNAL_ERROR` / 500 with a fixed message; the original text is
/// only logged.
pub fn error(failure: impl Into<Failure>) -> Reply<()> {
    let failure = failure.into();
    let (status, info) = match &failure {
        Failure::App(app) => render_app_error(app),
        Failure::Opaque(err) => match find_app_error(&**err) {
            Some(app) => render_app_error(app),
            None => {
                tracing::error!(error = %err, "Unhandled error rendered as internal error");
                (500, ErrorInfo::internal())
            }
        },
    };
    Reply {
        status,
        body: Some(Response::failure(info)),
    }
}

fn render_app_error(err: &AppError) -> (u16, ErrorInfo) {
    if err.is_server_error() {
        tracing::error!(
            code = %err.code(),
            status = err.status_code(),
            error = %err.chain_to_string(),
            "Request failed"
        );
    } else {
        tracing::debug!(
            code = %err.code(),
            status = err.status_code(),
            reason = err.message(),
            "Request rejected"
        );
    }
    (err.status_code(), ErrorInfo::from_app_error(err))
}

// ============================================================================
// Convenience constructors
// ============================================================================

/// 200 with `data`.
pub fn ok<T>(data: T) -> Reply<T> {
    json(STATUS_OK, data)
}

/// 201 with `data`.
pub fn created<T>(data: T) -> Reply<T> {
    json(STATUS_CREATED, data)
}

/// 204 without a body.
pub fn no_content() -> Reply<()> {
    Reply {
        status: STATUS_NO_CONTENT,
        body: None,
    }
}

/// 400 `VALIDATION_ERROR`.
pub fn bad_request(message: impl Into<String>) -> Reply<()> {
    error(AppError::validation(message.into()))
}

/// 404 `NOT_FOUND`.
pub fn not_found(message: impl Into<String>) -> Reply<()> {
    error(AppError::not_found(message.into()))
}

/// 401 `UNAUTHORIZED`.
pub fn unauthorized(message: impl Into<String>) -> Reply<()> {
    error(AppError::unauthorized(message.into()))
}

/// 500 `INTERNAL_ERROR`, keeping `err` only as the logged cause.
pub fn internal_error(err: impl Into<BoxError>) -> Reply<()> {
    error(AppError::wrap(err, ErrorCode::Internal, INTERNAL_ERROR_MESSAGE))
}

// ============================================================================
// Axum integration (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
mod axum_impl {
    use axum::Json;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde::Serialize;

    use super::{Failure, Reply, error};
    use crate::error::app_error::AppError;

    impl<T: Serialize> IntoResponse for Reply<T> {
        fn into_response(self) -> axum::response::Response {
            let status =
                StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            match self.body {
                Some(body) => (status, Json(body)).into_response(),
                None => status.into_response(),
            }
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> axum::response::Response {
            error(self).into_response()
        }
    }

    impl IntoResponse for Failure {
        fn into_response(self) -> axum::response::Response {
            error(self).into_response()
        }
    }
}
