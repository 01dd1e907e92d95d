//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the GatherNest application.

use crate::config::LoggingConfig;
use crate::utils::errors::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging based on configuration. The returned guard must be
/// held for the lifetime of the process or the file appender stops
/// flushing.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "gathernest.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log booking lifecycle actions with structured data
pub fn log_booking_action(booking_id: i64, action: &str, user_id: i64, details: Option<&str>) {
    info!(
        booking_id = booking_id,
        action = action,
        user_id = user_id,
        details = details,
        "Booking action performed"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}
