//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::AppError;

type Result<T> = std::result::Result<T, AppError>;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_auth_config(&settings.auth)?;
    validate_logging_config(&settings.logging)?;
    validate_limits_config(&settings.limits)?;

    if let Some(ref storage) = settings.storage {
        validate_storage_config(storage)?;
    }

    Ok(())
}

/// Validate HTTP server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(AppError::Config("Server host is required".to_string()));
    }

    if config.port == 0 {
        return Err(AppError::Config("Server port must be greater than 0".to_string()));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(AppError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(AppError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(AppError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(AppError::Config("Redis URL is required".to_string()));
    }

    Ok(())
}

/// Validate identity and session configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < 32 {
        return Err(AppError::Config(
            "JWT secret must be at least 32 bytes".to_string(),
        ));
    }

    if config.token_ttl_minutes <= 0 {
        return Err(AppError::Config(
            "Token TTL must be greater than 0".to_string(),
        ));
    }

    if config.google_client_id.is_empty() {
        return Err(AppError::Config(
            "Google OAuth client id is required".to_string(),
        ));
    }

    if config.google_tokeninfo_url.is_empty() {
        return Err(AppError::Config(
            "Google tokeninfo URL is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate blob storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.public_base_url.is_empty() {
        return Err(AppError::Config(
            "Storage public base URL is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(AppError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(AppError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

/// Validate operational limits
fn validate_limits_config(config: &super::LimitsConfig) -> Result<()> {
    if config.max_pending_events < 1 {
        return Err(AppError::Config(
            "Max pending events must be at least 1".to_string(),
        ));
    }

    if config.rate_limit_per_minute == 0 {
        return Err(AppError::Config(
            "Rate limit must be greater than 0".to_string(),
        ));
    }

    Ok(())
}
