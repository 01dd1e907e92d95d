//! HTTP handlers module
//!
//! Resource routers for the public API, assembled into one axum router
//! behind the shared middleware stack.

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod events;
pub mod health;
pub mod users;

use std::sync::Arc;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::{middleware as axum_middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::middleware::{authenticate, log_requests, rate_limit, RateLimiter};
use crate::services::ServiceFactory;

/// App state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub services: ServiceFactory,
    pub settings: Settings,
    pub db: DatabaseService,
    pub rate_limiter: Arc<RateLimiter>,
}

/// Build the application router with all routes and middleware attached
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.settings);

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(users::routes())
        .merge(events::routes())
        .merge(bookings::routes())
        .merge(admin::routes())
        // Layers run top-down per request: CORS and request logging first,
        // then authentication, then the per-user rate limit.
        .layer(axum_middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(axum_middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(log_requests))
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .server
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
