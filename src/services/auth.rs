use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::db::models::User;
use crate::db::UserRepository;
use crate::error::{AppError, AppResult};
use crate::services::password;
use crate::services::tokens::{AuthResponse, TokenIssuer};
use crate::services::users::UserRequest;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: Option<String>,
}

pub struct AuthService;

impl AuthService {
    /// Create an account: hash the password, persist, return the stored
    /// user. Duplicate emails are rejected up front; the unique index
    /// backs that check up under concurrency.
    pub async fn register(state: &Arc<AppState>, request: UserRequest) -> AppResult<User> {
        let (name, email, plain) = match (request.name, request.email, request.password) {
            (Some(name), Some(email), Some(plain))
                if !name.trim().is_empty() && !email.trim().is_empty() && !plain.is_empty() =>
            {
                (name, email, plain)
            }
            _ => {
                return Err(AppError::BadRequest(
                    "Insufficient parameters : name, email and password must be provided."
                        .to_string(),
                ))
            }
        };

        tracing::info!("Register new user with email : {}", email);

        if UserRepository::exists_by_email(&state.db, &email).await? {
            return Err(AppError::Conflict(format!(
                "User with email : {} already exists",
                email
            )));
        }

        let hashed = password::hash_password(&plain)?;
        let user = UserRepository::create(&state.db, &name, &email, &hashed).await?;

        tracing::info!("Registered user : {}", user.id);
        Ok(user)
    }

    /// Verify credentials and issue a token.
    pub async fn login(state: &Arc<AppState>, request: LoginRequest) -> AppResult<AuthResponse> {
        tracing::info!("Login attempt for email : {}", request.email);

        let user = UserRepository::find_by_email_or_throw(&state.db, &request.email).await?;

        // An absent or empty password can never match; don't hand it to bcrypt.
        let submitted = request.password.as_deref().unwrap_or_default();
        if submitted.is_empty() || !password::verify_password(submitted, &user.password) {
            return Err(AppError::InvalidCredentials("Invalid credentials".to_string()));
        }

        TokenIssuer::issue(&state.config.jwt, &user)
    }
}
