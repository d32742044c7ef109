pub mod google;
pub mod ics_file;
pub mod managed;

use chrono::{DateTime, Utc};

use crate::error::CalendarError;
use crate::model::event::{CalendarEvent, NewEvent};

pub use google::GoogleCalendar;
pub use ics_file::IcsFileCalendar;

/// The external calendar the schedule is mirrored into. Calls are blocking and issued one at a time.
pub trait CalendarStore {
    /// Events whose start falls in `[time_min, time_max)`.
    fn list_events(&self, time_min: DateTime<Utc>, time_max: DateTime<Utc>) -> Result<Vec<CalendarEvent>, CalendarError>;

    /// Create an event and return its id.
    fn create_event(&self, event: &NewEvent) -> Result<String, CalendarError>;

    /// Delete by id. An event that is already gone counts as deleted.
    fn delete_event(&self, event_id: &str) -> Result<(), CalendarError>;
}
