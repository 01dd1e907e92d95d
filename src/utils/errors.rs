//! Error handling for GatherNest
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy, including the mapping of
//! every error kind onto an HTTP response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Main error type for the GatherNest application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Booking not found: {booking_id}")]
    BookingNotFound { booking_id: i64 },

    #[error("You already have a booking for this event")]
    DuplicateBooking { event_id: i64, user_id: i64 },

    #[error("Not enough seats available")]
    CapacityExceeded { requested: i32, available: i32 },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Result type alias for GatherNest operations
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// HTTP status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Redis(_)
            | AppError::Http(_)
            | AppError::Serialization(_)
            | AppError::Jwt(_)
            | AppError::Io(_)
            | AppError::UrlParse(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::UserNotFound { .. }
            | AppError::EventNotFound { .. }
            | AppError::BookingNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::DuplicateBooking { .. } => StatusCode::CONFLICT,
            AppError::CapacityExceeded { .. }
            | AppError::InvalidStateTransition { .. }
            | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal failures are logged with detail but surfaced generically.
        let body = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            json!({ "error": "Internal server error" })
        } else {
            json!({ "error": self.to_string() })
        };

        (status, Json(body)).into_response()
    }
}
