//! Event model

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: EventCategory,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub location: String,
    pub address: Option<String>,
    pub maps_link: Option<String>,
    /// Hard ceiling on total confirmed attendance; never changed by bookings.
    pub seats: i32,
    pub host_id: i64,
    pub host_name: Option<String>,
    pub host_whatsapp: Option<String>,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    PetMeet,
    GamesNight,
    Recreation,
}

/// Moderation gate. Freshly created events stay off the public listing
/// until an admin approves them; rejection deletes the event outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Created,
    Approved,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Created => "created",
            EventStatus::Approved => "approved",
        }
    }
}

/// Event row together with its derived seat counters, as returned by the
/// listing queries. `seats_confirmed` sums number_of_people over CONFIRMED
/// bookings only.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventWithSeats {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    pub seats_confirmed: i64,
}

impl EventWithSeats {
    pub fn seats_available(&self) -> i64 {
        (self.event.seats as i64 - self.seats_confirmed).max(0)
    }
}

/// Pending event joined with its host's profile, for the moderation queue.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventWithHost {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    pub host_email: String,
    pub host_display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: String,
    pub category: EventCategory,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub location: String,
    pub address: Option<String>,
    pub maps_link: Option<String>,
    pub seats: i32,
    pub host_name: Option<String>,
    pub host_whatsapp: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<EventCategory>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub maps_link: Option<String>,
    pub seats: Option<i32>,
    pub host_name: Option<String>,
    pub host_whatsapp: Option<String>,
    pub image_url: Option<String>,
}

/// Admin decision on a pending event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    Approve,
    Reject,
}
