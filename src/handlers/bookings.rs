//! Booking endpoints
//!
//! Reservation creation, the requester's own list (with ready-made host
//! contact links), the host dashboard list, and the host-only status
//! transition.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::handlers::AppState;
use crate::middleware::CurrentUser;
use crate::models::booking::{
    Booking, BookingStatus, BookingWithEvent, BookingWithUser, CreateBookingRequest, HostBooking,
};
use crate::models::event::EventCategory;
use crate::services::contact::{whatsapp_url, ContactLinkRequest};
use crate::utils::helpers::format_event_date;
use crate::utils::errors::Result;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    pub event_id: i64,
    pub number_of_people: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingBody {
    pub status: BookingStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    pub host_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub number_of_people: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            event_id: booking.event_id,
            user_id: booking.user_id,
            number_of_people: booking.number_of_people,
            status: booking.status,
            created_at: booking.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUserInfo {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
}

/// Booking as shown to the host, with the requester's profile
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithUserResponse {
    pub id: i64,
    pub event_id: i64,
    pub number_of_people: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub user: BookingUserInfo,
}

impl From<BookingWithUser> for BookingWithUserResponse {
    fn from(row: BookingWithUser) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            number_of_people: row.number_of_people,
            status: row.status,
            created_at: row.created_at,
            user: BookingUserInfo {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingEventInfo {
    pub id: i64,
    pub name: String,
    pub category: EventCategory,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub address: Option<String>,
    pub seats: i32,
    pub host_name: Option<String>,
    pub host_whatsapp: Option<String>,
    pub image_url: Option<String>,
}

/// Booking as shown to its requester, with event display fields and a
/// prebuilt WhatsApp link to the host when one can be built
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBookingResponse {
    pub id: i64,
    pub number_of_people: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub event: BookingEventInfo,
    pub contact_link: Option<String>,
}

impl From<BookingWithEvent> for UserBookingResponse {
    fn from(row: BookingWithEvent) -> Self {
        let contact_link = build_contact_link(&row);
        Self {
            id: row.id,
            number_of_people: row.number_of_people,
            status: row.status,
            created_at: row.created_at,
            contact_link,
            event: BookingEventInfo {
                id: row.event_id,
                name: row.event_name,
                category: row.event_category,
                date: row.event_date,
                time: row.event_time,
                location: row.event_location,
                address: row.event_address,
                seats: row.event_seats,
                host_name: row.host_name,
                host_whatsapp: row.host_whatsapp,
                image_url: row.event_image_url,
            },
        }
    }
}

/// Booking on the host dashboard, spanning all of the host's events
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostBookingResponse {
    pub id: i64,
    pub event_id: i64,
    pub number_of_people: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub event_seats: i32,
    pub user: BookingUserInfo,
}

impl From<HostBooking> for HostBookingResponse {
    fn from(row: HostBooking) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            number_of_people: row.number_of_people,
            status: row.status,
            created_at: row.created_at,
            event_name: row.event_name,
            event_date: row.event_date,
            event_time: row.event_time,
            event_seats: row.event_seats,
            user: BookingUserInfo {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
        }
    }
}

/// The requester reaches the host themselves; we only hand back the link.
fn build_contact_link(row: &BookingWithEvent) -> Option<String> {
    let phone = row.host_whatsapp.as_deref()?;
    let request = ContactLinkRequest {
        phone_number: phone,
        event_name: &row.event_name,
        event_date: &format_event_date(row.event_date),
        host_name: row.host_name.as_deref().unwrap_or("there"),
        number_of_people: row.number_of_people,
        custom_message: None,
    };

    match whatsapp_url(&request) {
        Ok(url) => Some(url.into()),
        Err(e) => {
            debug!(booking_id = row.id, error = %e, "Skipping contact link");
            None
        }
    }
}

/// Response for user-facing booking lists: either the caller's own
/// reservations or, with `hostId`, the host dashboard view.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BookingListResponse {
    Own(Vec<UserBookingResponse>),
    Host(Vec<HostBookingResponse>),
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", get(list_bookings).post(create_booking))
        .route("/api/bookings/{booking_id}", patch(update_booking))
}

/// POST /api/bookings - place a reservation request
pub async fn create_booking(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(body): Json<CreateBookingBody>,
) -> Result<(StatusCode, Json<BookingResponse>)> {
    let booking = state
        .services
        .reservation_service
        .create_booking(
            &caller,
            CreateBookingRequest {
                event_id: body.event_id,
                number_of_people: body.number_of_people,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// GET /api/bookings - caller's reservations, or the host dashboard when
/// `hostId` is given
pub async fn list_bookings(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<BookingListResponse>> {
    let response = match query.host_id {
        Some(host_id) => {
            let bookings = state
                .services
                .reservation_service
                .list_host_bookings(&caller, host_id)
                .await?;
            BookingListResponse::Host(bookings.into_iter().map(Into::into).collect())
        }
        None => {
            let bookings = state
                .services
                .reservation_service
                .list_user_bookings(&caller)
                .await?;
            BookingListResponse::Own(bookings.into_iter().map(Into::into).collect())
        }
    };

    Ok(Json(response))
}

/// PATCH /api/bookings/{booking_id} - host confirms or cancels a booking
pub async fn update_booking(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(booking_id): Path<i64>,
    Json(body): Json<UpdateBookingBody>,
) -> Result<Json<BookingResponse>> {
    let booking = state
        .services
        .reservation_service
        .set_booking_status(&caller, booking_id, body.status)
        .await?;

    Ok(Json(booking.into()))
}
