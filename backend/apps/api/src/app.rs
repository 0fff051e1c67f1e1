//! Router assembly

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use kernel::validation::engine::Validator;
use serde_json::{Value, json};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use user::UserConfig;
use user::domain::repository::UserRepository;

use crate::config::Environment;
use crate::middleware::{self, MakeRequestUuid, REQUEST_ID_HEADER};

/// Everything the router needs, built once in `main`
pub struct AppParts<R> {
    pub env: Environment,
    pub origins: Vec<String>,
    pub validator: Arc<Validator>,
    pub user_repo: R,
    pub user_config: UserConfig,
}

/// Build the full application router with middleware
pub fn build<R>(parts: AppParts<R>) -> Router
where
    R: UserRepository + Send + Sync + 'static,
{
    let api = user::user_router(parts.user_repo, parts.validator, parts.user_config);

    // Layers run outermost-last: request id is set before the span opens
    Router::new()
        .route("/health", get(health).with_state(parts.env))
        .nest("/api/v1", api)
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(middleware::trace_layer())
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(middleware::cors(&parts.origins))
}

/// GET /health
async fn health(State(env): State<Environment>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "env": env.as_str(),
    }))
}
