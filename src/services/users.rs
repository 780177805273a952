use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::db::models::User;
use crate::db::UserRepository;
use crate::error::AppResult;
use crate::services::password;
use crate::AppState;

/// Shared payload for registration and self-service profile updates.
/// Every field is optional so updates can be partial.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct UserService;

impl UserService {
    /// List every account. Not routed; admin tooling and tests only.
    pub async fn index(state: &Arc<AppState>) -> AppResult<Vec<User>> {
        UserRepository::find_all(&state.db).await
    }

    pub async fn fetch(state: &Arc<AppState>, id: i64) -> AppResult<User> {
        UserRepository::find_or_throw(&state.db, id).await
    }

    /// Persistence only. Registration is the path that hashes the password
    /// and rejects duplicate emails up front.
    pub async fn create(
        state: &Arc<AppState>,
        name: &str,
        email: &str,
        password: &str,
    ) -> AppResult<User> {
        tracing::info!("Create new user with email : {}", email);
        UserRepository::create(&state.db, name, email, password).await
    }

    pub async fn update(state: &Arc<AppState>, id: i64, request: UserRequest) -> AppResult<User> {
        tracing::info!("Update user : {}", id);

        let existing = Self::fetch(state, id).await?;
        let merged = merge_user_request(existing, request)?;
        UserRepository::update(&state.db, &merged).await
    }

    pub async fn delete(state: &Arc<AppState>, id: i64) -> AppResult<()> {
        tracing::info!("Delete user : {}", id);

        let user = Self::fetch(state, id).await?;
        UserRepository::delete(&state.db, user.id).await
    }
}

/// Apply present fields onto the stored user. A supplied password is
/// re-hashed before it is stored; absent fields keep their stored values.
fn merge_user_request(mut user: User, request: UserRequest) -> AppResult<User> {
    if let Some(name) = request.name {
        user.name = name;
    }
    if let Some(email) = request.email {
        user.email = email;
    }
    if let Some(plain) = request.password {
        user.password = password::hash_password(&plain)?;
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::EventRepository;
    use crate::error::AppError;
    use crate::services::events::{EventRequest, EventService};
    use crate::test_support::{seed_user, test_state};
    use chrono::{NaiveDate, NaiveTime};

    #[tokio::test]
    async fn fetch_returns_stored_user() {
        let state = test_state().await;
        let user = seed_user(&state, "Alice", "alice@example.com").await;

        let fetched = UserService::fetch(&state, user.id).await.expect("fetch");
        assert_eq!(fetched.email, "alice@example.com");
    }

    #[tokio::test]
    async fn fetch_unknown_id_is_not_found() {
        let state = test_state().await;

        match UserService::fetch(&state, 999).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Entity with id 999 not found"),
            other => panic!("expected NotFound, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn index_lists_every_account() {
        let state = test_state().await;
        seed_user(&state, "Alice", "alice@example.com").await;
        seed_user(&state, "Bob", "bob@example.com").await;

        let users = UserService::index(&state).await.expect("index");
        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn create_persists_without_hashing() {
        let state = test_state().await;

        let user = UserService::create(&state, "Carol", "carol@example.com", "already-hashed")
            .await
            .expect("create");
        assert!(user.id > 0);
        assert_eq!(user.password, "already-hashed");
    }

    #[tokio::test]
    async fn update_merges_present_fields_only() {
        let state = test_state().await;
        let user = seed_user(&state, "Alice", "alice@example.com").await;

        let request = UserRequest {
            name: Some("Alice Cooper".to_string()),
            ..Default::default()
        };
        let updated = UserService::update(&state, user.id, request)
            .await
            .expect("update");

        assert_eq!(updated.name, "Alice Cooper");
        assert_eq!(updated.email, "alice@example.com");
        assert_eq!(updated.password, user.password);
    }

    #[tokio::test]
    async fn update_rehashes_supplied_password() {
        let state = test_state().await;
        let user = seed_user(&state, "Alice", "alice@example.com").await;

        let request = UserRequest {
            password: Some("new-password".to_string()),
            ..Default::default()
        };
        let updated = UserService::update(&state, user.id, request)
            .await
            .expect("update");

        assert_ne!(updated.password, "new-password");
        assert!(password::verify_password("new-password", &updated.password));
    }

    #[tokio::test]
    async fn update_to_taken_email_conflicts() {
        let state = test_state().await;
        seed_user(&state, "Alice", "alice@example.com").await;
        let bob = seed_user(&state, "Bob", "bob@example.com").await;

        let request = UserRequest {
            email: Some("alice@example.com".to_string()),
            ..Default::default()
        };
        match UserService::update(&state, bob.id, request).await {
            Err(AppError::Conflict(msg)) => {
                assert_eq!(msg, "User with email : alice@example.com already exists")
            }
            other => panic!("expected Conflict, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn delete_removes_user_and_cascades_to_events() {
        let state = test_state().await;
        let user = seed_user(&state, "Alice", "alice@example.com").await;

        let request = EventRequest {
            title: Some("Standup".to_string()),
            start_date: NaiveDate::from_ymd_opt(2023, 10, 15),
            end_date: NaiveDate::from_ymd_opt(2023, 10, 15),
            start_time: NaiveTime::from_hms_opt(9, 0, 0),
            end_time: NaiveTime::from_hms_opt(10, 0, 0),
            ..Default::default()
        };
        let event = EventService::create(&state, user.id, request)
            .await
            .expect("create event");

        UserService::delete(&state, user.id).await.expect("delete");

        match UserService::fetch(&state, user.id).await {
            Err(AppError::NotFound(_)) => {}
            other => panic!("expected NotFound, got: {:?}", other),
        }
        let orphaned = EventRepository::find_by_user_id_and_id(&state.db, user.id, event.id)
            .await
            .expect("query events");
        assert!(orphaned.is_none());
    }
}
