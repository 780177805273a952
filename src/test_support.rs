//! Shared helpers for tests: an in-memory database with migrations
//! applied and a seeded user.

use std::str::FromStr;
use std::sync::Arc;

use crate::config::Config;
use crate::db::models::User;
use crate::db::UserRepository;
use crate::AppState;

pub async fn test_state() -> Arc<AppState> {
    let options = sqlx::sqlite::SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("parse sqlite url")
        .foreign_keys(true);

    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    let mut config = Config::default();
    config.jwt.secret = "test-secret-key".to_string();

    Arc::new(AppState { db: pool, config })
}

/// Insert a user directly. The stored password is an opaque placeholder;
/// flows that verify credentials should register through `AuthService`.
pub async fn seed_user(state: &Arc<AppState>, name: &str, email: &str) -> User {
    UserRepository::create(&state.db, name, email, "$2b$12$placeholder")
        .await
        .expect("insert user")
}
