//! GatherNest community events API
//!
//! A community events marketplace: hosts publish events with a fixed seat
//! count, attendees request reservations, hosts confirm or cancel them, and
//! admins moderate submissions. This library provides the configuration,
//! persistence, service and HTTP layers of the API.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{AppError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
