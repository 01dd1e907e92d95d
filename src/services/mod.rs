//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod contact;
pub mod event;
pub mod redis;
pub mod reservation;

// Re-export commonly used services
pub use auth::{AuthContext, AuthService};
pub use event::EventService;
pub use redis::RedisService;
pub use reservation::ReservationService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub event_service: EventService,
    pub reservation_service: ReservationService,
    pub redis_service: RedisService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: Settings, db: DatabaseService) -> Result<Self> {
        let redis_service = RedisService::new(settings.clone())?;
        let auth_service = AuthService::new(
            db.users.clone(),
            redis_service.clone(),
            settings.clone(),
        )?;
        let event_service = EventService::new(db.clone(), settings);
        let reservation_service = ReservationService::new(db);

        Ok(Self {
            auth_service,
            event_service,
            reservation_service,
            redis_service,
        })
    }

    /// Health check for the cache layer; the database has its own
    pub async fn redis_healthy(&self) -> bool {
        self.redis_service.health_check().await.unwrap_or(false)
    }
}
