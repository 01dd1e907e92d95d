//! Authentication middleware
//!
//! Resolves the `Authorization: Bearer` header into an [`AuthContext`]
//! request extension. Requests without the header pass through untouched;
//! handlers that need an identity demand it via the [`CurrentUser`]
//! extractor, so public and protected routes share one middleware stack.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::handlers::AppState;
use crate::services::auth::AuthContext;
use crate::utils::errors::AppError;

/// Authenticate the request if it carries a bearer token. A present but
/// invalid token is rejected outright; a missing one just leaves the
/// request anonymous.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(value) = request.headers().get(AUTHORIZATION) {
        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthenticated)?;

        let context = state.services.auth_service.authenticate(token).await?;
        debug!(user_id = context.user_id, "Request authenticated");
        request.extensions_mut().insert(context);
    }

    Ok(next.run(request).await)
}

/// Extractor for handlers that require an authenticated caller
pub struct CurrentUser(pub AuthContext);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .map(CurrentUser)
            .ok_or(AppError::Unauthenticated)
    }
}

/// Extractor for handlers that serve both anonymous and signed-in callers
pub struct OptionalUser(pub Option<AuthContext>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(parts.extensions.get::<AuthContext>().copied()))
    }
}
