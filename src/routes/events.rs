use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::db::models::{Event, EventType};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::services::events::{EventRequest, EventService};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/:id",
            get(fetch_event).put(update_event).delete(delete_event),
        )
}

#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    pub date: Option<NaiveDate>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub time_zone: String,
    pub event_type: EventType,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            user_id: event.user_id,
            title: event.title,
            description: event.description,
            start_date: event.start_date,
            end_date: event.end_date,
            start_time: event.start_time,
            end_time: event.end_time,
            time_zone: event.time_zone,
            event_type: event.event_type,
        }
    }
}

/// Lists events for the caller. `?date=` returns the events covering a single
/// day; `?start=&end=` returns everything overlapping the range. A request
/// with neither form is rejected by the service layer.
async fn list_events(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<EventListQuery>,
) -> AppResult<Json<Vec<EventResponse>>> {
    let events = if query.date.is_some() {
        EventService::find_all_by_user_id_and_date(&state, user_id, query.date).await?
    } else if query.start.is_some() || query.end.is_some() {
        EventService::find_all_by_user_id_and_range(&state, user_id, query.start, query.end)
            .await?
    } else {
        EventService::find_all_by_user_id_and_date(&state, user_id, None).await?
    };

    Ok(Json(events.into_iter().map(Into::into).collect()))
}

async fn fetch_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<EventResponse>> {
    let event = EventService::fetch(&state, user_id, id).await?;
    Ok(Json(event.into()))
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<EventRequest>,
) -> AppResult<impl IntoResponse> {
    let event = EventService::create(&state, user_id, request).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, "/v1/events")],
        Json(EventResponse::from(event)),
    ))
}

async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<EventRequest>,
) -> AppResult<Json<EventResponse>> {
    let event = EventService::update(&state, user_id, id, request).await?;
    Ok(Json(event.into()))
}

async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    EventService::delete(&state, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
