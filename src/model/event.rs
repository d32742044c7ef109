use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// An event as listed from a calendar store. Only the fields the resync engine reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: Option<DateTime<Utc>>,
}

/// An event to be written for one game.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}
