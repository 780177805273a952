//! Pure validation rules for events. No clock reads, no I/O: callers
//! supply the candidate and the set of stored events to compare against.

use chrono::Datelike;

use crate::db::models::Event;
use crate::error::{AppError, AppResult};

/// Shape rules for a single event: times must form a non-empty interval
/// and the start date must not predate year 1900.
pub fn validate_event(event: &Event) -> AppResult<()> {
    if event.end_time <= event.start_time {
        return Err(AppError::BadRequest(
            "End Time must be greater than Start Time.".to_string(),
        ));
    }

    if event.start_date.year() < 1900 {
        return Err(AppError::BadRequest(
            "Event Date cannot be earlier than year 1900.".to_string(),
        ));
    }

    Ok(())
}

/// Half-open overlap check against the supplied events: two events clash
/// when one starts before the other ends and ends after the other starts,
/// so intervals that merely touch do not conflict. The candidate's own
/// stored row is excluded by id, which lets updates overlap the slot they
/// are vacating.
pub fn ensure_no_conflict(event: &Event, existing_events: &[Event]) -> AppResult<()> {
    let conflict = existing_events
        .iter()
        .filter(|existing| existing.id != event.id)
        .any(|existing| {
            event.start_time < existing.end_time && event.end_time > existing.start_time
        });

    if conflict {
        return Err(AppError::Conflict(
            "Event scheduling conflicts with an existing event".to_string(),
        ));
    }

    Ok(())
}
