use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use crate::error::AppResult;
use crate::routes::users::UserResponse;
use crate::services::auth::{AuthService, LoginRequest};
use crate::services::tokens::AuthResponse;
use crate::services::users::UserRequest;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UserRequest>,
) -> AppResult<impl IntoResponse> {
    let user = AuthService::register(&state, request).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, "/v1/auth/register")],
        Json(UserResponse::from(user)),
    ))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = AuthService::login(&state, request).await?;
    Ok(Json(response))
}
