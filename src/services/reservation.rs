//! Reservation service implementation
//!
//! Owns the lifecycle of bookings against an event's fixed seat pool and is
//! the only code allowed to change booking state. Two invariants hold at
//! all times: a user holds at most one booking per event, and the sum of
//! number_of_people over CONFIRMED bookings never exceeds the event's
//! seat count.
//!
//! Creation is optimistic: a request is admitted as PENDING as long as the
//! already-CONFIRMED seats leave room for it, so requests may oversubscribe.
//! Confirmation is authoritative: it re-derives the confirmed total inside a
//! transaction that holds the event row lock, so concurrent confirmations
//! serialize per event and can never jointly oversell.

use tracing::{debug, info};

use crate::database::DatabaseService;
use crate::models::booking::{
    Booking, BookingStatus, BookingWithEvent, BookingWithUser, CreateBookingRequest, HostBooking,
};
use crate::models::event::Event;
use crate::services::auth::AuthContext;
use crate::utils::errors::{AppError, Result};
use crate::utils::logging::log_booking_action;

/// Reservation service mediating all booking state changes
#[derive(Debug, Clone)]
pub struct ReservationService {
    db: DatabaseService,
}

impl ReservationService {
    /// Create a new ReservationService instance
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Place a reservation request on an event. The booking is persisted as
    /// PENDING; only the host confirming it occupies seats for real.
    pub async fn create_booking(
        &self,
        caller: &AuthContext,
        request: CreateBookingRequest,
    ) -> Result<Booking> {
        if request.number_of_people < 1 {
            return Err(AppError::InvalidInput(
                "Number of people must be at least 1".to_string(),
            ));
        }

        let event = self
            .db
            .events
            .find_by_id(request.event_id)
            .await?
            .ok_or(AppError::EventNotFound {
                event_id: request.event_id,
            })?;

        if self
            .db
            .bookings
            .find_by_event_and_user(event.id, caller.user_id)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateBooking {
                event_id: event.id,
                user_id: caller.user_id,
            });
        }

        // Optimistic capacity gate: only CONFIRMED bookings count here, so
        // pending requests may oversubscribe. The confirmation path is the
        // authoritative check.
        let confirmed = self.db.bookings.confirmed_seats(event.id).await?;
        let available = (event.seats as i64 - confirmed).max(0);
        if confirmed + request.number_of_people as i64 > event.seats as i64 {
            debug!(
                event_id = event.id,
                requested = request.number_of_people,
                available = available,
                "Booking rejected at creation, seats exhausted"
            );
            return Err(AppError::CapacityExceeded {
                requested: request.number_of_people,
                available: available as i32,
            });
        }

        let booking = self
            .db
            .bookings
            .create(event.id, caller.user_id, request.number_of_people)
            .await?;

        log_booking_action(booking.id, "created", caller.user_id, None);
        Ok(booking)
    }

    /// Transition a booking to CONFIRMED or CANCELLED on behalf of the
    /// event host. The whole read-recompute-write sequence runs in one
    /// transaction holding the event row lock.
    pub async fn set_booking_status(
        &self,
        caller: &AuthContext,
        booking_id: i64,
        new_status: BookingStatus,
    ) -> Result<Booking> {
        if new_status == BookingStatus::Pending {
            return Err(AppError::InvalidInput(
                "A booking cannot be moved back to PENDING".to_string(),
            ));
        }

        let mut tx = self.db.pool.begin().await?;

        let booking = self
            .db
            .bookings
            .find_with_host_for_update(&mut tx, booking_id)
            .await?
            .ok_or(AppError::BookingNotFound { booking_id })?;

        // Only the owning event's host may flip booking state, no matter
        // what state the booking is in.
        if booking.host_id != caller.user_id {
            return Err(AppError::PermissionDenied(
                "Only the event host can update this booking".to_string(),
            ));
        }

        if !booking.status.can_transition_to(new_status) {
            return Err(AppError::InvalidStateTransition {
                from: booking.status.as_str().to_string(),
                to: new_status.as_str().to_string(),
            });
        }

        if new_status == BookingStatus::Confirmed && booking.status != BookingStatus::Confirmed {
            // Authoritative capacity gate: every other CONFIRMED booking of
            // this event, counted under the event row lock.
            let confirmed = self
                .db
                .bookings
                .confirmed_seats_excluding(&mut tx, booking.event_id, booking.id)
                .await?;
            let available = (booking.seats as i64 - confirmed).max(0);

            if confirmed + booking.number_of_people as i64 > booking.seats as i64 {
                debug!(
                    booking_id = booking.id,
                    event_id = booking.event_id,
                    requested = booking.number_of_people,
                    available = available,
                    "Confirmation rejected, would oversell"
                );
                return Err(AppError::CapacityExceeded {
                    requested: booking.number_of_people,
                    available: available as i32,
                });
            }
        }

        let updated = self
            .db
            .bookings
            .update_status_tx(&mut tx, booking_id, new_status)
            .await?;

        tx.commit().await?;

        info!(
            booking_id = updated.id,
            event_id = updated.event_id,
            status = updated.status.as_str(),
            host_id = caller.user_id,
            "Booking status updated"
        );
        Ok(updated)
    }

    /// Host view of a single event: the event plus every booking on it,
    /// any status, newest first.
    pub async fn list_event_bookings(
        &self,
        caller: &AuthContext,
        event_id: i64,
    ) -> Result<(Event, Vec<BookingWithUser>)> {
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::EventNotFound { event_id })?;

        if event.host_id != caller.user_id {
            return Err(AppError::PermissionDenied(
                "Only the event host can view its bookings".to_string(),
            ));
        }

        let bookings = self.db.bookings.list_for_event(event_id).await?;
        Ok((event, bookings))
    }

    /// All bookings the caller has placed, joined with event display fields
    pub async fn list_user_bookings(&self, caller: &AuthContext) -> Result<Vec<BookingWithEvent>> {
        self.db.bookings.list_for_user(caller.user_id).await
    }

    /// All bookings across the caller's own events, for the host dashboard.
    /// `host_id` must be the caller; the host view is not served to anyone
    /// else.
    pub async fn list_host_bookings(
        &self,
        caller: &AuthContext,
        host_id: i64,
    ) -> Result<Vec<HostBooking>> {
        if host_id != caller.user_id {
            return Err(AppError::PermissionDenied(
                "Hosts can only view bookings for their own events".to_string(),
            ));
        }

        self.db.bookings.list_for_host(host_id).await
    }
}
