use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use crate::db::models::User;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::services::users::{UserRequest, UserService};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(me))
        .route("/", put(update_account).delete(delete_account))
}

/// Public view of a user. The password hash never leaves the service layer.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserService::fetch(&state, user_id).await?;
    Ok(Json(user.into()))
}

async fn update_account(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<UserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = UserService::update(&state, user_id, request).await?;
    Ok(Json(user.into()))
}

async fn delete_account(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> AppResult<StatusCode> {
    UserService::delete(&state, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
