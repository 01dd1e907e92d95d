//! Booking model
//!
//! A booking is a user's request to occupy some number of an event's seats.
//! Its status walks a small state machine owned by the event host:
//! PENDING -> CONFIRMED, PENDING -> CANCELLED, CONFIRMED -> CANCELLED.
//! Nothing ever returns to PENDING and CANCELLED is terminal.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::event::EventCategory;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub number_of_people: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    /// Whether the host may move a booking from `self` to `next`.
    /// Re-applying the current status is allowed as an idempotent no-op.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        match (*self, next) {
            (from, to) if from == to => true,
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub event_id: i64,
    pub number_of_people: i32,
}

/// Booking joined with the capacity context of its owning event, fetched
/// with the event row locked inside the confirmation transaction.
#[derive(Debug, Clone, FromRow)]
pub struct BookingWithHost {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub number_of_people: i32,
    pub status: BookingStatus,
    pub host_id: i64,
    pub seats: i32,
}

/// Booking joined with the requester's profile, for the host's attendee view.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingWithUser {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub number_of_people: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub user_name: Option<String>,
    pub user_email: String,
}

/// Booking joined with the owning event's display fields, for the
/// requester's own list. Carries everything a client needs to render the
/// reservation and build the outbound host contact link.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingWithEvent {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub number_of_people: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub event_name: String,
    pub event_category: EventCategory,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub event_location: String,
    pub event_address: Option<String>,
    pub event_seats: i32,
    pub host_name: Option<String>,
    pub host_whatsapp: Option<String>,
    pub event_image_url: Option<String>,
}

/// Booking joined with event and requester fields, for the host dashboard
/// listing across all of the host's events.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HostBooking {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub number_of_people: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub event_seats: i32,
    pub user_name: Option<String>,
    pub user_email: String,
}
