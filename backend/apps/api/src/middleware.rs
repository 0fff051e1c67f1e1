//! HTTP middleware
//!
//! Request correlation ids, panic recovery, request spans and CORS.

use std::any::Any;
use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{HeaderName, HeaderValue, Method, Request, header};
use axum::response::{IntoResponse, Response};
use kernel::AppError;
use kernel::response;
use platform::client::extract_client_ip;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::request_id::{MakeRequestId, RequestId};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

/// Correlation header, echoed back on every response
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

// ============================================================================
// Request ID
// ============================================================================

/// Generates a UUID v4 request id when the client did not send one
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = kernel::id::RequestId::new().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

// ============================================================================
// Tracing
// ============================================================================

/// Span for one HTTP request, tagged with request id and client IP
pub fn make_request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    let direct_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let client_ip = extract_client_ip(request.headers(), direct_ip)
        .map(|ip| ip.to_string())
        .unwrap_or_default();

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id,
        client_ip,
    )
}

/// Request tracing with start/finish events at INFO
pub type RequestTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    fn(&Request<Body>) -> Span,
    DefaultOnRequest,
    DefaultOnResponse,
>;

pub fn trace_layer() -> RequestTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(make_request_span as fn(&Request<Body>) -> Span)
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

// ============================================================================
// Panic recovery
// ============================================================================

/// パニックを汎用エラーレスポンスに変換
///
/// The panic payload is logged; the client only sees the generic envelope.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    tracing::error!(panic = detail, "Panic recovered");

    response::error(AppError::internal(response::INTERNAL_ERROR_MESSAGE)).into_response()
}

// ============================================================================
// CORS
// ============================================================================

/// CORS for the configured frontend origins
pub fn cors(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            REQUEST_ID_HEADER,
        ]))
        .expose_headers([REQUEST_ID_HEADER])
        .allow_credentials(true)
}
