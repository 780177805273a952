use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::models::User;
use crate::error::{AppError, AppResult};

pub struct UserRepository;

impl UserRepository {
    pub async fn find_all(pool: &SqlitePool) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Find by id or fail with the standard not-found message.
    pub async fn find_or_throw(pool: &SqlitePool, id: i64) -> AppResult<User> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Entity with id {} not found", id)))
    }

    pub async fn exists_by_email(pool: &SqlitePool, email: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(pool)
            .await
            .map_err(AppError::Database)?;

        Ok(count > 0)
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_by_email_or_throw(pool: &SqlitePool, email: &str) -> AppResult<User> {
        Self::find_by_email(pool, email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with email {} not found", email)))
    }

    /// Insert a new user. The database assigns the id; the email unique
    /// index is the last line of defence against duplicate accounts.
    pub async fn create(
        pool: &SqlitePool,
        name: &str,
        email: &str,
        password: &str,
    ) -> AppResult<User> {
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, email, password, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(|e| Self::map_unique_email(e, email))
    }

    pub async fn update(pool: &SqlitePool, user: &User) -> AppResult<User> {
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = ?, email = ?, password = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, name, email, password, created_at, updated_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(now)
        .bind(user.id)
        .fetch_one(pool)
        .await
        .map_err(|e| Self::map_unique_email(e, &user.email))
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;

        Ok(())
    }

    fn map_unique_email(e: sqlx::Error, email: &str) -> AppError {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("User with email : {} already exists", email))
            }
            _ => AppError::Database(e),
        }
    }
}
