//! Admin moderation endpoints
//!
//! The moderation queue and the approve/reject decision. Both require an
//! ADMIN caller; the check itself lives in the event service.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::handlers::events::EventResponse;
use crate::handlers::AppState;
use crate::middleware::CurrentUser;
use crate::models::event::{EventWithHost, ModerationAction};
use crate::utils::errors::Result;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingHostInfo {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEventResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub host: PendingHostInfo,
}

impl From<EventWithHost> for PendingEventResponse {
    fn from(row: EventWithHost) -> Self {
        let host = PendingHostInfo {
            id: row.event.host_id,
            name: row.host_display_name,
            email: row.host_email,
        };
        Self {
            event: row.event.into(),
            host,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationBody {
    pub event_id: i64,
    pub action: ModerationAction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EventResponse>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/events/pending", get(list_pending))
        .route("/api/admin/events/approve", post(moderate))
}

/// GET /api/admin/events/pending - the moderation queue
pub async fn list_pending(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Vec<PendingEventResponse>>> {
    let events = state
        .services
        .event_service
        .list_pending_events(&caller)
        .await?;

    Ok(Json(events.into_iter().map(Into::into).collect()))
}

/// POST /api/admin/events/approve - approve or reject a submission
pub async fn moderate(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(body): Json<ModerationBody>,
) -> Result<Json<ModerationResponse>> {
    let approved = state
        .services
        .event_service
        .moderate_event(&caller, body.event_id, body.action)
        .await?;

    let response = match approved {
        Some(event) => ModerationResponse {
            message: "Event approved successfully".to_string(),
            event: Some(event.into()),
        },
        None => ModerationResponse {
            message: "Event rejected and deleted successfully".to_string(),
            event: None,
        },
    };

    Ok(Json(response))
}
