//! Event repository implementation

use crate::models::event::{
    CreateEventRequest, Event, EventStatus, EventWithHost, EventWithSeats, UpdateEventRequest,
};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};

const EVENT_COLUMNS: &str = "id, name, description, category, event_date, event_time, location, address, maps_link, seats, host_id, host_name, host_whatsapp, image_url, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new event owned by `host_id`. Freshly created events always
    /// start in the `created` moderation state.
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        host_id: i64,
        request: CreateEventRequest,
    ) -> Result<Event, AppError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (name, description, category, event_date, event_time, location, address, maps_link, seats, host_id, host_name, host_whatsapp, image_url, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.name)
        .bind(request.description)
        .bind(request.category)
        .bind(request.event_date)
        .bind(request.event_time)
        .bind(request.location)
        .bind(request.address)
        .bind(request.maps_link)
        .bind(request.seats)
        .bind(host_id)
        .bind(request.host_name)
        .bind(request.host_whatsapp)
        .bind(request.image_url)
        .bind(EventStatus::Created)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event fields
    pub async fn update(&self, id: i64, request: UpdateEventRequest) -> Result<Event, AppError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                event_date = COALESCE($5, event_date),
                event_time = COALESCE($6, event_time),
                location = COALESCE($7, location),
                address = COALESCE($8, address),
                maps_link = COALESCE($9, maps_link),
                seats = COALESCE($10, seats),
                host_name = COALESCE($11, host_name),
                host_whatsapp = COALESCE($12, host_whatsapp),
                image_url = COALESCE($13, image_url),
                updated_at = $14
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name)
        .bind(request.description)
        .bind(request.category)
        .bind(request.event_date)
        .bind(request.event_time)
        .bind(request.location)
        .bind(request.address)
        .bind(request.maps_link)
        .bind(request.seats)
        .bind(request.host_name)
        .bind(request.host_whatsapp)
        .bind(request.image_url)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event. Bookings go with it via ON DELETE CASCADE.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Set the moderation status
    pub async fn set_status(&self, id: i64, status: EventStatus) -> Result<Event, AppError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Publicly listed events: approved only, soonest first, each with its
    /// confirmed seat total derived from CONFIRMED bookings.
    pub async fn list_approved(&self) -> Result<Vec<EventWithSeats>, AppError> {
        let events = sqlx::query_as::<_, EventWithSeats>(
            r#"
            SELECT e.*,
                   COALESCE(SUM(b.number_of_people) FILTER (WHERE b.status = 'CONFIRMED'), 0) AS seats_confirmed
            FROM events e
            LEFT JOIN bookings b ON b.event_id = e.id
            WHERE e.status = 'approved'
            GROUP BY e.id
            ORDER BY e.event_date ASC, e.event_time ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// All events owned by a host regardless of moderation status, with the
    /// same derived seat counters as the public listing.
    pub async fn list_by_host(&self, host_id: i64) -> Result<Vec<EventWithSeats>, AppError> {
        let events = sqlx::query_as::<_, EventWithSeats>(
            r#"
            SELECT e.*,
                   COALESCE(SUM(b.number_of_people) FILTER (WHERE b.status = 'CONFIRMED'), 0) AS seats_confirmed
            FROM events e
            LEFT JOIN bookings b ON b.event_id = e.id
            WHERE e.host_id = $1
            GROUP BY e.id
            ORDER BY e.event_date ASC, e.event_time ASC
            "#,
        )
        .bind(host_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Moderation queue: events still in `created` status, newest first,
    /// joined with their host's profile.
    pub async fn list_pending(&self) -> Result<Vec<EventWithHost>, AppError> {
        let events = sqlx::query_as::<_, EventWithHost>(
            r#"
            SELECT e.*, u.email AS host_email, u.name AS host_display_name
            FROM events e
            INNER JOIN users u ON u.id = e.host_id
            WHERE e.status = 'created'
            ORDER BY e.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Number of events a host has awaiting moderation
    pub async fn count_created_by_host(&self, host_id: i64) -> Result<i64, AppError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM events WHERE host_id = $1 AND status = 'created'",
        )
        .bind(host_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Same count, inside the event-creation transaction
    pub async fn count_created_by_host_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        host_id: i64,
    ) -> Result<i64, AppError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM events WHERE host_id = $1 AND status = 'created'",
        )
        .bind(host_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(count.0)
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64, AppError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Pool accessor so services can open multi-statement transactions.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
