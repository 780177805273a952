use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::models::{Event, EventType, DEFAULT_TIME_ZONE};
use crate::db::EventRepository;
use crate::error::{AppError, AppResult};
use crate::services::validator;
use crate::AppState;

/// Payload for creating and updating events. Every field is optional:
/// creates enforce presence here, updates merge onto the stored event.
/// There is deliberately no owner field; the owner always comes from the
/// authenticated caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub time_zone: Option<String>,
    pub event_type: Option<String>,
}

pub struct EventService;

impl EventService {
    /// Events whose date span contains `date`. The date is required.
    pub async fn find_all_by_user_id_and_date(
        state: &Arc<AppState>,
        user_id: i64,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<Event>> {
        let date = date.ok_or_else(|| {
            AppError::BadRequest("Insufficient parameters : date must be provided.".to_string())
        })?;

        tracing::info!("Find events for user : {} on date : {}", user_id, date);
        EventRepository::find_all_by_user_id_and_date(&state.db, user_id, date).await
    }

    /// Events whose date span intersects `[start, end]`. Both bounds are
    /// required.
    pub async fn find_all_by_user_id_and_range(
        state: &Arc<AppState>,
        user_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<Vec<Event>> {
        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(AppError::BadRequest(
                    "Insufficient parameters : start date and end date must be provided."
                        .to_string(),
                ))
            }
        };

        tracing::info!(
            "Find events for user : {} between : {} and {}",
            user_id,
            start,
            end
        );
        EventRepository::find_all_by_user_id_and_range(&state.db, user_id, start, end).await
    }

    pub async fn fetch(state: &Arc<AppState>, user_id: i64, id: i64) -> AppResult<Event> {
        EventRepository::find_by_user_id_and_id_or_throw(&state.db, user_id, id).await
    }

    pub async fn create(
        state: &Arc<AppState>,
        user_id: i64,
        request: EventRequest,
    ) -> AppResult<Event> {
        tracing::info!("Create new event for user : {}", user_id);

        let event = build_event(user_id, request)?;
        validator::validate_event(&event)?;

        // Snapshot read: two concurrent creates can both pass this check
        // and double-book the slot.
        let existing = EventRepository::find_all_by_user_id_and_range(
            &state.db,
            user_id,
            event.start_date,
            event.end_date,
        )
        .await?;
        validator::ensure_no_conflict(&event, &existing)?;

        EventRepository::create(&state.db, &event).await
    }

    pub async fn update(
        state: &Arc<AppState>,
        user_id: i64,
        id: i64,
        request: EventRequest,
    ) -> AppResult<Event> {
        tracing::info!("Update event : {} for user : {}", id, user_id);

        let existing = Self::fetch(state, user_id, id).await?;
        let merged = merge_event_request(existing, request)?;
        validator::validate_event(&merged)?;

        let window = EventRepository::find_all_by_user_id_and_range(
            &state.db,
            user_id,
            merged.start_date,
            merged.end_date,
        )
        .await?;
        validator::ensure_no_conflict(&merged, &window)?;

        EventRepository::update(&state.db, &merged).await
    }

    pub async fn delete(state: &Arc<AppState>, user_id: i64, id: i64) -> AppResult<()> {
        tracing::info!("Delete event : {} for user : {}", id, user_id);

        let event = Self::fetch(state, user_id, id).await?;
        EventRepository::delete(&state.db, event.id).await
    }
}

/// First construction stage for creates: field presence and request-level
/// shape checks, then defaults. Interval and conflict rules run afterwards
/// in the validator.
fn build_event(user_id: i64, request: EventRequest) -> AppResult<Event> {
    let title = match request.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => {
            return Err(AppError::BadRequest(
                "Insufficient parameters : title must be provided.".to_string(),
            ))
        }
    };

    let (start_date, end_date) = match (request.start_date, request.end_date) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(AppError::BadRequest(
                "Insufficient parameters : start date and end date must be provided.".to_string(),
            ))
        }
    };

    let (start_time, end_time) = match (request.start_time, request.end_time) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(AppError::BadRequest(
                "Insufficient parameters : start time and end time must be provided.".to_string(),
            ))
        }
    };

    check_title_length(&title)?;
    check_date_order(start_date, end_date)?;

    let event_type = parse_event_type(request.event_type.as_deref())?.unwrap_or_default();
    let now = Utc::now().naive_utc();

    Ok(Event {
        // Placeholder until the database assigns the key on insert.
        id: 0,
        user_id,
        title,
        description: request.description,
        start_date,
        end_date,
        start_time,
        end_time,
        time_zone: request
            .time_zone
            .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string()),
        event_type,
        created_at: now,
        updated_at: now,
    })
}

/// Apply present fields onto the stored event. Identity (`id`, `user_id`)
/// never changes; absent fields keep their stored values.
fn merge_event_request(mut event: Event, request: EventRequest) -> AppResult<Event> {
    if let Some(title) = request.title {
        check_title_length(&title)?;
        event.title = title;
    }
    if let Some(description) = request.description {
        event.description = Some(description);
    }
    if let Some(start_date) = request.start_date {
        event.start_date = start_date;
    }
    if let Some(end_date) = request.end_date {
        event.end_date = end_date;
    }
    if let Some(start_time) = request.start_time {
        event.start_time = start_time;
    }
    if let Some(end_time) = request.end_time {
        event.end_time = end_time;
    }
    if let Some(time_zone) = request.time_zone {
        event.time_zone = time_zone;
    }
    if let Some(event_type) = parse_event_type(request.event_type.as_deref())? {
        event.event_type = event_type;
    }

    check_date_order(event.start_date, event.end_date)?;
    Ok(event)
}

fn parse_event_type(value: Option<&str>) -> AppResult<Option<EventType>> {
    match value {
        Some(raw) => {
            let parsed = EventType::try_from(raw).map_err(AppError::BadRequest)?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn check_title_length(title: &str) -> AppResult<()> {
    if title.len() > 255 {
        return Err(AppError::BadRequest(
            "Title must not exceed 255 characters.".to_string(),
        ));
    }
    Ok(())
}

fn check_date_order(start_date: NaiveDate, end_date: NaiveDate) -> AppResult<()> {
    if end_date < start_date {
        return Err(AppError::BadRequest(
            "End Date cannot be earlier than Start Date.".to_string(),
        ));
    }
    Ok(())
}
