use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::db::models::Event;
use crate::error::{AppError, AppResult};

pub struct EventRepository;

impl EventRepository {
    /// Events whose date span contains the given date, ordered for
    /// calendar display.
    pub async fn find_all_by_user_id_and_date(
        pool: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
    ) -> AppResult<Vec<Event>> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT
                id, user_id, title, description,
                start_date, end_date, start_time, end_time,
                time_zone, event_type, created_at, updated_at
            FROM events
            WHERE user_id = ? AND start_date <= ? AND end_date >= ?
            ORDER BY start_date, start_time
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(date)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Events whose date span intersects `[start, end]`.
    pub async fn find_all_by_user_id_and_range(
        pool: &SqlitePool,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Event>> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT
                id, user_id, title, description,
                start_date, end_date, start_time, end_time,
                time_zone, event_type, created_at, updated_at
            FROM events
            WHERE user_id = ? AND start_date <= ? AND end_date >= ?
            ORDER BY start_date, start_time
            "#,
        )
        .bind(user_id)
        .bind(end)
        .bind(start)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_by_user_id_and_id(
        pool: &SqlitePool,
        user_id: i64,
        id: i64,
    ) -> AppResult<Option<Event>> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT
                id, user_id, title, description,
                start_date, end_date, start_time, end_time,
                time_zone, event_type, created_at, updated_at
            FROM events
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_by_user_id_and_id_or_throw(
        pool: &SqlitePool,
        user_id: i64,
        id: i64,
    ) -> AppResult<Event> {
        Self::find_by_user_id_and_id(pool, user_id, id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Event with id {} not found for user {}",
                    id, user_id
                ))
            })
    }

    /// Insert a new event. Any id on the value is ignored; the database
    /// assigns the key.
    pub async fn create(pool: &SqlitePool, event: &Event) -> AppResult<Event> {
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                user_id, title, description,
                start_date, end_date, start_time, end_time,
                time_zone, event_type, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id, user_id, title, description,
                start_date, end_date, start_time, end_time,
                time_zone, event_type, created_at, updated_at
            "#,
        )
        .bind(event.user_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.time_zone)
        .bind(event.event_type)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn update(pool: &SqlitePool, event: &Event) -> AppResult<Event> {
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET
                title = ?, description = ?,
                start_date = ?, end_date = ?, start_time = ?, end_time = ?,
                time_zone = ?, event_type = ?, updated_at = ?
            WHERE id = ?
            RETURNING
                id, user_id, title, description,
                start_date, end_date, start_time, end_time,
                time_zone, event_type, created_at, updated_at
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.time_zone)
        .bind(event.event_type)
        .bind(now)
        .bind(event.id)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;

        Ok(())
    }
}
