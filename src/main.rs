//! GatherNest community events API
//!
//! Main application entry point

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use GatherNest::{
    config::Settings,
    database::{connection, DatabaseService},
    handlers::{create_router, AppState},
    middleware::{RateLimitConfig, RateLimiter},
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate().context("Invalid configuration")?;

    // Initialize logging; the guard keeps the file appender alive
    let _guard = logging::init_logging(&settings.logging).context("Failed to initialize logging")?;

    info!("Starting GatherNest API...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = connection::DatabaseConfig::from_settings(&settings.database);
    let pool = connection::create_pool(&db_config)
        .await
        .context("Failed to connect to database")?;

    // Run database migrations
    connection::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    // Initialize services
    info!("Initializing services...");
    let database_service = DatabaseService::new(pool);
    let services = ServiceFactory::new(settings.clone(), database_service.clone())
        .context("Failed to initialize services")?;

    let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig::from_settings(&settings)));

    let state = AppState {
        services,
        settings: settings.clone(),
        db: database_service,
        rate_limiter,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(addr = %addr, "GatherNest API is ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("GatherNest API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
