//! Health endpoint

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::database;
use crate::handlers::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: bool,
    redis: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health - liveness plus component connectivity
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = database::health_check(&state.db.pool).await.is_ok();
    let redis = state.services.redis_healthy().await;

    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        redis,
    })
}
