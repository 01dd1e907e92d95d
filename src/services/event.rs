//! Event service implementation
//!
//! Host-side CRUD for events plus the admin moderation flow. Events enter
//! in `created` status and only reach the public listing once approved;
//! rejection deletes the submission outright. All ownership checks compare
//! the caller's id against the event's host_id.

use tracing::info;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::models::event::{
    CreateEventRequest, Event, EventStatus, EventWithHost, EventWithSeats, ModerationAction,
    UpdateEventRequest,
};
use crate::services::auth::AuthContext;
use crate::utils::errors::{AppError, Result};
use crate::utils::logging::log_admin_action;

/// Event service for hosting and moderation operations
#[derive(Debug, Clone)]
pub struct EventService {
    db: DatabaseService,
    settings: Settings,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(db: DatabaseService, settings: Settings) -> Self {
        Self { db, settings }
    }

    /// Create an event owned by the caller. A host may only keep a limited
    /// number of submissions in the moderation queue at once; the count and
    /// insert share a transaction.
    pub async fn create_event(
        &self,
        caller: &AuthContext,
        request: CreateEventRequest,
    ) -> Result<Event> {
        if request.seats < 1 {
            return Err(AppError::InvalidInput(
                "Seats must be at least 1".to_string(),
            ));
        }

        self.validate_image_url(request.image_url.as_deref())?;

        let mut tx = self.db.pool.begin().await?;

        let pending = self
            .db
            .events
            .count_created_by_host_tx(&mut tx, caller.user_id)
            .await?;

        let max_pending = self.settings.limits.max_pending_events;
        if pending >= max_pending {
            return Err(AppError::InvalidInput(format!(
                "You already have {} events pending approval. Please wait for admin approval before creating more events.",
                max_pending
            )));
        }

        let event = self.db.events.create(&mut tx, caller.user_id, request).await?;
        tx.commit().await?;

        info!(event_id = event.id, host_id = caller.user_id, "Event created");
        Ok(event)
    }

    /// Fetch one event. Approved events are public; a submission still in
    /// moderation is only visible to its host and to admins.
    pub async fn get_event(&self, caller: Option<&AuthContext>, event_id: i64) -> Result<Event> {
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::EventNotFound { event_id })?;

        if event.status == EventStatus::Approved {
            return Ok(event);
        }

        match caller {
            Some(ctx) if ctx.user_id == event.host_id || ctx.is_admin() => Ok(event),
            // Hide the existence of unapproved events from everyone else.
            _ => Err(AppError::EventNotFound { event_id }),
        }
    }

    /// Edit event fields. Host only.
    pub async fn update_event(
        &self,
        caller: &AuthContext,
        event_id: i64,
        request: UpdateEventRequest,
    ) -> Result<Event> {
        if let Some(seats) = request.seats {
            if seats < 1 {
                return Err(AppError::InvalidInput(
                    "Seats must be at least 1".to_string(),
                ));
            }
        }
        self.validate_image_url(request.image_url.as_deref())?;

        self.require_host(caller, event_id).await?;
        self.db.events.update(event_id, request).await
    }

    /// Delete an event and, via cascade, all of its bookings. Host only.
    pub async fn delete_event(&self, caller: &AuthContext, event_id: i64) -> Result<()> {
        self.require_host(caller, event_id).await?;
        self.db.events.delete(event_id).await?;

        info!(event_id = event_id, host_id = caller.user_id, "Event deleted");
        Ok(())
    }

    /// Public listing: approved events, soonest first, with derived seat
    /// counters.
    pub async fn list_public_events(&self) -> Result<Vec<EventWithSeats>> {
        self.db.events.list_approved().await
    }

    /// All of a host's own events regardless of status. Only the host
    /// themself may use the filter.
    pub async fn list_host_events(
        &self,
        caller: &AuthContext,
        host_id: i64,
    ) -> Result<Vec<EventWithSeats>> {
        if host_id != caller.user_id {
            return Err(AppError::PermissionDenied(
                "Hosts can only list their own events".to_string(),
            ));
        }

        self.db.events.list_by_host(host_id).await
    }

    /// Number of the caller's events still awaiting moderation
    pub async fn pending_count(&self, caller: &AuthContext) -> Result<i64> {
        self.db.events.count_created_by_host(caller.user_id).await
    }

    /// Moderation queue for admins: every submission in `created` status
    pub async fn list_pending_events(&self, caller: &AuthContext) -> Result<Vec<EventWithHost>> {
        caller.require_admin()?;
        self.db.events.list_pending().await
    }

    /// Admin decision on a submission: approval publishes the event,
    /// rejection deletes it.
    pub async fn moderate_event(
        &self,
        caller: &AuthContext,
        event_id: i64,
        action: ModerationAction,
    ) -> Result<Option<Event>> {
        caller.require_admin()?;

        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::EventNotFound { event_id })?;

        match action {
            ModerationAction::Approve => {
                let approved = self.db.events.set_status(event.id, EventStatus::Approved).await?;
                log_admin_action(caller.user_id, "event_approved", Some(&event.id.to_string()), None);
                Ok(Some(approved))
            }
            ModerationAction::Reject => {
                self.db.events.delete(event.id).await?;
                log_admin_action(caller.user_id, "event_rejected", Some(&event.id.to_string()), None);
                Ok(None)
            }
        }
    }

    async fn require_host(&self, caller: &AuthContext, event_id: i64) -> Result<Event> {
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::EventNotFound { event_id })?;

        if event.host_id != caller.user_id {
            return Err(AppError::PermissionDenied(
                "Only the event host can modify this event".to_string(),
            ));
        }

        Ok(event)
    }

    /// Image URLs are opaque pointers into blob storage; when a bucket base
    /// URL is configured, reject anything pointing elsewhere.
    fn validate_image_url(&self, image_url: Option<&str>) -> Result<()> {
        let (Some(url), Some(storage)) = (image_url, self.settings.storage.as_ref()) else {
            return Ok(());
        };

        if !url.starts_with(&storage.public_base_url) {
            return Err(AppError::InvalidInput(
                "Image URL must point at the event image storage".to_string(),
            ));
        }

        Ok(())
    }
}
