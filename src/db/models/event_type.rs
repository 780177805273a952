use serde::{Deserialize, Serialize};

/// Closed set of event categories, stored as the variant name string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum EventType {
    Work,
    Personal,
    Other,
}

impl EventType {
    /// Convert from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "work" => Some(EventType::Work),
            "personal" => Some(EventType::Personal),
            "other" => Some(EventType::Other),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Work => "Work",
            EventType::Personal => "Personal",
            EventType::Other => "Other",
        }
    }
}

impl Default for EventType {
    fn default() -> Self {
        EventType::Other
    }
}

impl From<EventType> for String {
    fn from(event_type: EventType) -> Self {
        event_type.as_str().to_string()
    }
}

impl TryFrom<&str> for EventType {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value).ok_or_else(|| format!("Invalid event type : {}", value))
    }
}

impl TryFrom<String> for EventType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_any_casing() {
        assert_eq!(EventType::from_str("work"), Some(EventType::Work));
        assert_eq!(EventType::from_str("PERSONAL"), Some(EventType::Personal));
        assert_eq!(EventType::from_str("Other"), Some(EventType::Other));
    }

    #[test]
    fn rejects_unknown_values() {
        assert_eq!(EventType::from_str("meeting"), None);

        match EventType::try_from("meeting") {
            Err(msg) => assert_eq!(msg, "Invalid event type : meeting"),
            Ok(value) => panic!("expected parse failure, got: {:?}", value),
        }
    }

    #[test]
    fn canonical_name_round_trips() {
        for event_type in [EventType::Work, EventType::Personal, EventType::Other] {
            assert_eq!(EventType::from_str(event_type.as_str()), Some(event_type));
        }
    }
}
