//! Sign-in endpoint
//!
//! Exchanges a Google ID token for an API session token. All other
//! endpoints authenticate with the returned bearer token.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::handlers::AppState;
use crate::models::user::{User, UserType};
use crate::utils::errors::Result;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInBody {
    pub id_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub user_type: UserType,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            avatar_url: user.avatar_url,
            user_type: user.user_type,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub token: String,
    pub user: UserResponse,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/auth/session", post(sign_in))
}

/// POST /api/auth/session - sign in with a Google ID token
pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInBody>,
) -> Result<Json<SignInResponse>> {
    let (user, token) = state
        .services
        .auth_service
        .sign_in_with_google(&body.id_token)
        .await?;

    Ok(Json(SignInResponse {
        token,
        user: user.into(),
    }))
}
