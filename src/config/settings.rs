//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub storage: Option<StorageConfig>,
    pub logging: LoggingConfig,
    pub limits: LimitsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to call the API from a browser; empty means
    /// same-origin only.
    pub cors_allowed_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Identity and session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret for signing API session tokens.
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    /// Accounts signing in with one of these emails are promoted to ADMIN.
    pub admin_emails: Vec<String>,
    /// OAuth client id our Google ID tokens must be issued for.
    pub google_client_id: String,
    /// Google's tokeninfo endpoint; overridable so tests can point it at a
    /// local mock.
    pub google_tokeninfo_url: String,
}

/// Blob storage configuration. The API never uploads; it only validates
/// that image URLs attached to events point into our bucket.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub public_base_url: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

/// Operational limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Maximum events a host may have awaiting moderation.
    pub max_pending_events: i64,
    /// Per-user request budget for the rate limiting middleware.
    pub rate_limit_per_minute: u32,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("GATHERNEST")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::AppError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                cors_allowed_origins: vec![],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/gathernest".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "gathernest:".to_string(),
                ttl_seconds: 300,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                token_ttl_minutes: 60 * 24 * 7,
                admin_emails: vec![],
                google_client_id: String::new(),
                google_tokeninfo_url: "https://oauth2.googleapis.com/tokeninfo".to_string(),
            },
            storage: None,
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
            },
            limits: LimitsConfig {
                max_pending_events: 2,
                rate_limit_per_minute: 60,
            },
        }
    }
}
