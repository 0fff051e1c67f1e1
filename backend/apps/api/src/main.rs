//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::app_error::AppError`.

mod app;
mod config;
mod middleware;

use std::net::SocketAddr;
use std::sync::Arc;

use kernel::validation::engine::Validator;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use user::presentation::dto::CreateUserRequest;
use user::{PgUserRepository, UserConfig};

use crate::app::AppParts;
use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config);

    tracing::info!(
        app = %config.app.name,
        version = %config.app.version,
        env = config.app.env.as_str(),
        "Starting API server"
    );

    // Validator: built once, schemas checked before serving traffic
    let validator = Validator::new(config.locale);
    validator.check::<CreateUserRequest>()?;
    tracing::info!(locale = %validator.locale(), "Validator ready");

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(config.database.connect_options()?)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let user_config = UserConfig {
        password_pepper: config
            .password_pepper
            .as_ref()
            .map(|p| p.expose().as_bytes().to_vec()),
        ..UserConfig::default()
    };

    // Build router
    let router = app::build(AppParts {
        env: config.app.env,
        origins: config.frontend_origins.clone(),
        validator: Arc::new(validator),
        user_repo: PgUserRepository::new(pool),
        user_config,
    });

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// `RUST_LOG` wins over `LOG_LEVEL`; JSON lines in production, text elsewhere.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.app.log_level;
        format!("api={level},user={level},kernel={level},tower_http={level}").into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.app.env.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
