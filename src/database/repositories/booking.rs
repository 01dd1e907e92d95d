//! Booking repository implementation
//!
//! Plain reads and writes for bookings, plus the transaction-scoped
//! variants the confirmation path uses. The capacity math itself lives in
//! the reservation service; this module only answers the queries.

use crate::models::booking::{
    Booking, BookingStatus, BookingWithEvent, BookingWithHost, BookingWithUser, HostBooking,
};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};

#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new booking in PENDING status
    pub async fn create(
        &self,
        event_id: i64,
        user_id: i64,
        number_of_people: i32,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (event_id, user_id, number_of_people, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, event_id, user_id, number_of_people, status, created_at, updated_at
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(number_of_people)
        .bind(BookingStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            // The (event_id, user_id) unique index backs the uniqueness
            // invariant even when two requests race past the pre-check.
            sqlx::Error::Database(db)
                if db.constraint() == Some("bookings_event_id_user_id_key") =>
            {
                AppError::DuplicateBooking { event_id, user_id }
            }
            _ => AppError::Database(e),
        })?;

        Ok(booking)
    }

    /// Find booking by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT id, event_id, user_id, number_of_people, status, created_at, updated_at FROM bookings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Find the booking a user holds on an event, if any
    pub async fn find_by_event_and_user(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT id, event_id, user_id, number_of_people, status, created_at, updated_at FROM bookings WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Total seats currently held by CONFIRMED bookings of an event
    pub async fn confirmed_seats(&self, event_id: i64) -> Result<i64, AppError> {
        let total: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(number_of_people), 0) FROM bookings WHERE event_id = $1 AND status = 'CONFIRMED'",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.0)
    }

    /// Fetch a booking joined with its event's host and seat ceiling, with
    /// the event row locked for the rest of the transaction. Serializes
    /// concurrent confirmations per event.
    pub async fn find_with_host_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i64,
    ) -> Result<Option<BookingWithHost>, AppError> {
        let booking = sqlx::query_as::<_, BookingWithHost>(
            r#"
            SELECT b.id, b.event_id, b.user_id, b.number_of_people, b.status,
                   e.host_id, e.seats
            FROM bookings b
            INNER JOIN events e ON e.id = b.event_id
            WHERE b.id = $1
            FOR UPDATE OF e
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(booking)
    }

    /// Confirmed seat total over all *other* bookings of an event, so a
    /// re-confirm never counts the booking being confirmed twice.
    pub async fn confirmed_seats_excluding(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
        booking_id: i64,
    ) -> Result<i64, AppError> {
        let total: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(number_of_people), 0) FROM bookings WHERE event_id = $1 AND status = 'CONFIRMED' AND id <> $2",
        )
        .bind(event_id)
        .bind(booking_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(total.0)
    }

    /// Persist a status transition inside the confirmation transaction
    pub async fn update_status_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, event_id, user_id, number_of_people, status, created_at, updated_at
            "#,
        )
        .bind(booking_id)
        .bind(status)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await?;

        Ok(booking)
    }

    /// All bookings for an event regardless of status, newest first, with
    /// requester profiles. Host-only view; authorization happens above.
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<BookingWithUser>, AppError> {
        let bookings = sqlx::query_as::<_, BookingWithUser>(
            r#"
            SELECT b.id, b.event_id, b.user_id, b.number_of_people, b.status, b.created_at,
                   u.name AS user_name, u.email AS user_email
            FROM bookings b
            INNER JOIN users u ON u.id = b.user_id
            WHERE b.event_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// All bookings placed by a user, newest first, joined with the owning
    /// event's display fields.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<BookingWithEvent>, AppError> {
        let bookings = sqlx::query_as::<_, BookingWithEvent>(
            r#"
            SELECT b.id, b.event_id, b.user_id, b.number_of_people, b.status, b.created_at,
                   e.name AS event_name, e.category AS event_category,
                   e.event_date, e.event_time,
                   e.location AS event_location, e.address AS event_address,
                   e.seats AS event_seats, e.host_name, e.host_whatsapp,
                   e.image_url AS event_image_url
            FROM bookings b
            INNER JOIN events e ON e.id = b.event_id
            WHERE b.user_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Bookings across every event a host owns, newest first, for the host
    /// dashboard.
    pub async fn list_for_host(&self, host_id: i64) -> Result<Vec<HostBooking>, AppError> {
        let bookings = sqlx::query_as::<_, HostBooking>(
            r#"
            SELECT b.id, b.event_id, b.user_id, b.number_of_people, b.status, b.created_at,
                   e.name AS event_name, e.event_date, e.event_time, e.seats AS event_seats,
                   u.name AS user_name, u.email AS user_email
            FROM bookings b
            INNER JOIN events e ON e.id = b.event_id
            INNER JOIN users u ON u.id = b.user_id
            WHERE e.host_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(host_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Count total bookings
    pub async fn count(&self) -> Result<i64, AppError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
