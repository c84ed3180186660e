//! Calendar event types.
//!
//! An `Event` is a single dated entry. Its display color is never stored on the
//! event itself: it is looked up from the category table, so the two can't drift.
//! The persisted JSON still carries a `color` field so stored lists stay readable
//! by other tools; it is ignored when loading.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CalGridError, CalGridResult};

/// Wire format for dates (zero-padded ISO calendar date).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse YYYY-MM-DD into a date.
pub fn parse_date(s: &str) -> CalGridResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| CalGridError::InvalidDate(s.to_string()))
}

/// Format a date as YYYY-MM-DD.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Fixed classification of an event. Determines its display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EventCategory {
    #[default]
    Work,
    Personal,
    Important,
}

impl EventCategory {
    pub const ALL: [EventCategory; 3] = [
        EventCategory::Work,
        EventCategory::Personal,
        EventCategory::Important,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EventCategory::Work => "Work",
            EventCategory::Personal => "Personal",
            EventCategory::Important => "Important",
        }
    }

    /// Hex color for this category (e.g. "#2196f3")
    pub fn color(&self) -> &'static str {
        match self {
            EventCategory::Work => "#2196f3",
            EventCategory::Personal => "#4caf50",
            EventCategory::Important => "#f44336",
        }
    }

    /// The category color as an (r, g, b) triple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            EventCategory::Work => (0x21, 0x96, 0xf3),
            EventCategory::Personal => (0x4c, 0xaf, 0x50),
            EventCategory::Important => (0xf4, 0x43, 0x36),
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EventCategory {
    type Err = CalGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CalGridError::UnknownCategory(s.to_string()))
    }
}

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "EventRecord", from = "EventRecord")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub category: EventCategory,
}

impl Event {
    /// Create a new event with a freshly generated id.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        date: NaiveDate,
        category: EventCategory,
    ) -> Self {
        Event {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description,
            date,
            category,
        }
    }

    pub fn color(&self) -> &'static str {
        self.category.color()
    }

    /// The same event on another day.
    pub fn moved_to(&self, date: NaiveDate) -> Event {
        Event {
            date,
            ..self.clone()
        }
    }

    /// Case-insensitive substring match against title, description and category.
    /// Expects `needle` to already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
            || self.category.name().to_lowercase().contains(needle)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Persisted shape of an event.
#[derive(Serialize, Deserialize)]
struct EventRecord {
    id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    date: NaiveDate,
    category: EventCategory,
    #[serde(default)]
    color: String,
}

impl From<Event> for EventRecord {
    fn from(event: Event) -> Self {
        EventRecord {
            color: event.color().to_string(),
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.date,
            category: event.category,
        }
    }
}

impl From<EventRecord> for Event {
    fn from(record: EventRecord) -> Self {
        Event {
            id: record.id,
            title: record.title,
            description: record.description,
            date: record.date,
            category: record.category,
        }
    }
}

/// Unvalidated event form input.
///
/// Turning a draft into an event fails (returns `None`) when the title is blank.
/// Callers treat that as "nothing to save" rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub category: EventCategory,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, category: EventCategory) -> Self {
        EventDraft {
            title: title.into(),
            description: String::new(),
            category,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Prefill a draft from an existing event (for editing).
    pub fn from_event(event: &Event) -> Self {
        EventDraft {
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            category: event.category,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }

    fn description(&self) -> Option<String> {
        let d = self.description.trim();
        if d.is_empty() { None } else { Some(d.to_string()) }
    }

    /// Build a new event on `date`.
    pub fn to_event(&self, date: NaiveDate) -> Option<Event> {
        if !self.is_valid() {
            return None;
        }
        Some(Event::new(
            self.title.trim(),
            self.description(),
            date,
            self.category,
        ))
    }

    /// Apply the draft's fields to an existing event, keeping its id and date.
    pub fn apply_to(&self, event: &Event) -> Option<Event> {
        if !self.is_valid() {
            return None;
        }
        Some(Event {
            title: self.title.trim().to_string(),
            description: self.description(),
            category: self.category,
            ..event.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sep(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    #[test]
    fn test_category_colors() {
        assert_eq!(EventCategory::Work.color(), "#2196f3");
        assert_eq!(EventCategory::Personal.color(), "#4caf50");
        assert_eq!(EventCategory::Important.color(), "#f44336");
    }

    #[test]
    fn test_rgb_matches_hex() {
        for category in EventCategory::ALL {
            let (r, g, b) = category.rgb();
            assert_eq!(format!("#{:02x}{:02x}{:02x}", r, g, b), category.color());
        }
    }

    #[test]
    fn test_category_from_str_is_case_insensitive() {
        assert_eq!("work".parse::<EventCategory>().unwrap(), EventCategory::Work);
        assert_eq!(" IMPORTANT ".parse::<EventCategory>().unwrap(), EventCategory::Important);
        assert!("holiday".parse::<EventCategory>().is_err());
    }

    #[test]
    fn test_work_event_color() {
        let event = Event::new("Standup", None, sep(10), EventCategory::Work);
        assert_eq!(event.color(), EventCategory::Work.color());
    }

    #[test]
    fn test_serialized_shape() {
        let event = Event {
            id: "1".to_string(),
            title: "Meeting".to_string(),
            description: None,
            date: sep(9),
            category: EventCategory::Personal,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "1",
                "title": "Meeting",
                "date": "2025-09-09",
                "category": "Personal",
                "color": "#4caf50",
            })
        );
    }

    #[test]
    fn test_stored_color_is_ignored() {
        let json = r#"{"id":"1","title":"Meeting","date":"2025-09-09","category":"Work","color":"Blue","description":"Sample"}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.color(), "#2196f3");
        assert_eq!(event.description.as_deref(), Some("Sample"));
    }

    #[test]
    fn test_parse_and_format_date() {
        let date = parse_date("2025-09-01").unwrap();
        assert_eq!(format_date(date), "2025-09-01");
        assert!(parse_date("2025/09/01").is_err());
        assert!(parse_date("2025-02-30").is_err());
    }

    #[test]
    fn test_blank_draft_is_rejected() {
        let draft = EventDraft::new("   ", EventCategory::Work);
        assert!(draft.to_event(sep(1)).is_none());
    }

    #[test]
    fn test_draft_trims_fields() {
        let draft = EventDraft::new("  Lunch ", EventCategory::Personal).with_description("  ");
        let event = draft.to_event(sep(2)).unwrap();
        assert_eq!(event.title, "Lunch");
        assert_eq!(event.description, None);
        assert_eq!(event.date, sep(2));
    }

    #[test]
    fn test_apply_keeps_id_and_date() {
        let event = Event::new("Old", None, sep(3), EventCategory::Work);
        let draft = EventDraft::new("New", EventCategory::Important).with_description("details");
        let updated = draft.apply_to(&event).unwrap();
        assert_eq!(updated.id, event.id);
        assert_eq!(updated.date, event.date);
        assert_eq!(updated.title, "New");
        assert_eq!(updated.category, EventCategory::Important);
        assert_eq!(updated.description.as_deref(), Some("details"));
    }

    #[test]
    fn test_matches_lowercase() {
        let event = Event::new("Dentist", Some("Bring X-rays".into()), sep(4), EventCategory::Personal);
        assert!(event.matches_lowercase("dent"));
        assert!(event.matches_lowercase("x-ray"));
        assert!(event.matches_lowercase("personal"));
        assert!(!event.matches_lowercase("work"));
    }
}
