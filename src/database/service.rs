//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{BookingRepository, DatabasePool, EventRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub pool: DatabasePool,
    pub users: UserRepository,
    pub events: EventRepository,
    pub bookings: BookingRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            pool,
        }
    }
}
