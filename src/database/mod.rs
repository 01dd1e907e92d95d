//! Database module
//!
//! This module contains database connection management, repositories,
//! and the aggregate database service.

pub mod connection;
pub mod repositories;
pub mod service;

pub use connection::{create_pool, health_check, run_migrations, DatabasePool};
pub use repositories::{BookingRepository, EventRepository, UserRepository};
pub use service::DatabaseService;
