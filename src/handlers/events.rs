//! Event endpoints
//!
//! Public listing and detail, host-side CRUD, the host's pending counter
//! and the host's per-event booking view.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::handlers::bookings::BookingWithUserResponse;
use crate::handlers::AppState;
use crate::middleware::{CurrentUser, OptionalUser};
use crate::models::event::{
    CreateEventRequest, Event, EventCategory, EventStatus, EventWithSeats, UpdateEventRequest,
};
use crate::utils::errors::{AppError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListQuery {
    pub host_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventBody {
    pub name: String,
    pub description: String,
    pub category: EventCategory,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub address: Option<String>,
    pub maps_link: Option<String>,
    pub seats: i32,
    pub host_name: Option<String>,
    pub host_whatsapp: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<EventCategory>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub maps_link: Option<String>,
    pub seats: Option<i32>,
    pub host_name: Option<String>,
    pub host_whatsapp: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: EventCategory,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub address: Option<String>,
    pub maps_link: Option<String>,
    pub seats: i32,
    pub host_id: i64,
    pub host_name: Option<String>,
    pub host_whatsapp: Option<String>,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            description: event.description,
            category: event.category,
            date: event.event_date,
            time: event.event_time,
            location: event.location,
            address: event.address,
            maps_link: event.maps_link,
            seats: event.seats,
            host_id: event.host_id,
            host_name: event.host_name,
            host_whatsapp: event.host_whatsapp,
            image_url: event.image_url,
            status: event.status,
            created_at: event.created_at,
        }
    }
}

/// Listing entry: the event plus its derived seat counters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummaryResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub seats_confirmed: i64,
    pub seats_available: i64,
}

impl From<EventWithSeats> for EventSummaryResponse {
    fn from(row: EventWithSeats) -> Self {
        let seats_available = row.seats_available();
        Self {
            seats_confirmed: row.seats_confirmed,
            seats_available,
            event: row.event.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCountResponse {
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBookingsResponse {
    pub event: EventResponse,
    pub bookings: Vec<BookingWithUserResponse>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/pending-count", get(pending_count))
        .route(
            "/api/events/{event_id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/api/events/{event_id}/bookings", get(event_bookings))
}

/// GET /api/events - public listing of approved events; with `hostId`,
/// the caller's own events regardless of status
pub async fn list_events(
    State(state): State<AppState>,
    OptionalUser(caller): OptionalUser,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<EventSummaryResponse>>> {
    let events = match query.host_id {
        Some(host_id) => {
            let caller = caller.ok_or(AppError::Unauthenticated)?;
            state
                .services
                .event_service
                .list_host_events(&caller, host_id)
                .await?
        }
        None => state.services.event_service.list_public_events().await?,
    };

    Ok(Json(events.into_iter().map(Into::into).collect()))
}

/// POST /api/events - create an event awaiting moderation
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(body): Json<CreateEventBody>,
) -> Result<(StatusCode, Json<EventResponse>)> {
    let request = CreateEventRequest {
        name: body.name,
        description: body.description,
        category: body.category,
        event_date: body.date,
        event_time: body.time,
        location: body.location,
        address: body.address,
        maps_link: body.maps_link,
        seats: body.seats,
        host_name: body.host_name,
        host_whatsapp: body.host_whatsapp,
        image_url: body.image_url,
    };

    let event = state
        .services
        .event_service
        .create_event(&caller, request)
        .await?;

    Ok((StatusCode::CREATED, Json(event.into())))
}

/// GET /api/events/{event_id} - event detail
pub async fn get_event(
    State(state): State<AppState>,
    OptionalUser(caller): OptionalUser,
    Path(event_id): Path<i64>,
) -> Result<Json<EventResponse>> {
    let event = state
        .services
        .event_service
        .get_event(caller.as_ref(), event_id)
        .await?;

    Ok(Json(event.into()))
}

/// PUT /api/events/{event_id} - edit an owned event
pub async fn update_event(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(event_id): Path<i64>,
    Json(body): Json<UpdateEventBody>,
) -> Result<Json<EventResponse>> {
    let request = UpdateEventRequest {
        name: body.name,
        description: body.description,
        category: body.category,
        event_date: body.date,
        event_time: body.time,
        location: body.location,
        address: body.address,
        maps_link: body.maps_link,
        seats: body.seats,
        host_name: body.host_name,
        host_whatsapp: body.host_whatsapp,
        image_url: body.image_url,
    };

    let event = state
        .services
        .event_service
        .update_event(&caller, event_id, request)
        .await?;

    Ok(Json(event.into()))
}

/// DELETE /api/events/{event_id} - delete an owned event and its bookings
pub async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<DeleteResponse>> {
    state
        .services
        .event_service
        .delete_event(&caller, event_id)
        .await?;

    Ok(Json(DeleteResponse { success: true }))
}

/// GET /api/events/pending-count - caller's events awaiting moderation
pub async fn pending_count(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<PendingCountResponse>> {
    let count = state.services.event_service.pending_count(&caller).await?;

    Ok(Json(PendingCountResponse { count }))
}

/// GET /api/events/{event_id}/bookings - host view of all bookings on an
/// event
pub async fn event_bookings(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Json<EventBookingsResponse>> {
    let (event, bookings) = state
        .services
        .reservation_service
        .list_event_bookings(&caller, event_id)
        .await?;

    Ok(Json(EventBookingsResponse {
        event: event.into(),
        bookings: bookings.into_iter().map(Into::into).collect(),
    }))
}
