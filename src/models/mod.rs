//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod booking;
pub mod event;
pub mod user;

// Re-export commonly used models
pub use booking::{
    Booking, BookingStatus, BookingWithEvent, BookingWithHost, BookingWithUser,
    CreateBookingRequest, HostBooking,
};
pub use event::{
    CreateEventRequest, Event, EventCategory, EventStatus, EventWithHost, EventWithSeats,
    ModerationAction, UpdateEventRequest,
};
pub use user::{CreateUserRequest, UpdateUserRequest, User, UserType};
