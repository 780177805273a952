use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Invitation state for a shared event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum InvitationStatus {
    Invited,
    Accepted,
    Declined,
}

impl InvitationStatus {
    /// Convert from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "invited" => Some(InvitationStatus::Invited),
            "accepted" => Some(InvitationStatus::Accepted),
            "declined" => Some(InvitationStatus::Declined),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(self) -> &'static str {
        match self {
            InvitationStatus::Invited => "Invited",
            InvitationStatus::Accepted => "Accepted",
            InvitationStatus::Declined => "Declined",
        }
    }
}

impl Default for InvitationStatus {
    fn default() -> Self {
        InvitationStatus::Invited
    }
}

/// Attendee row for a shared event. The table exists for forward
/// compatibility; no current flow writes it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EventParticipant {
    pub event_id: i64,
    pub user_id: i64,
    pub is_organizer: bool,
    pub status: InvitationStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_invited() {
        assert_eq!(InvitationStatus::default(), InvitationStatus::Invited);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            InvitationStatus::from_str("ACCEPTED"),
            Some(InvitationStatus::Accepted)
        );
        assert_eq!(InvitationStatus::from_str("nope"), None);
    }
}
