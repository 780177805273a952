use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::event_type::EventType;

/// Applied when a create request does not name a zone.
pub const DEFAULT_TIME_ZONE: &str = "Asia/Kolkata";

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    /// Owner. Always taken from the authenticated caller, never from a
    /// request body.
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub time_zone: String,
    pub event_type: EventType,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
