//! User endpoints

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::handlers::AppState;
use crate::middleware::CurrentUser;
use crate::models::user::UserType;
use crate::utils::errors::Result;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTypeResponse {
    pub user_type: UserType,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/user/type", get(user_type))
}

/// GET /api/user/type - role of the authenticated caller
pub async fn user_type(CurrentUser(context): CurrentUser) -> Result<Json<UserTypeResponse>> {
    Ok(Json(UserTypeResponse {
        user_type: context.user_type,
    }))
}
