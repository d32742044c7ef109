use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use icalendar::{Component, EventLike};
use tracing::{error, info, instrument};

use crate::calendar::CalendarStore;
use crate::error::CalendarError;
use crate::model::event::{CalendarEvent, NewEvent};

/// A calendar kept in a local `.ics` file. Each call reads the file and writes it back whole.
#[derive(Debug, Clone)]
pub struct IcsFileCalendar {
    path: PathBuf,
}

impl IcsFileCalendar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the calendar; a missing file is an empty calendar.
    fn load(&self) -> Result<icalendar::Calendar, CalendarError> {
        if !self.path.exists() {
            return Ok(icalendar::Calendar::new());
        }
        let body = fs::read_to_string(&self.path)
            .map_err(|e| CalendarError::Unavailable(format!("Failed to read {}: {}", self.path.display(), e)))?;
        if body.trim().is_empty() {
            return Ok(icalendar::Calendar::new());
        }
        match icalendar::parser::read_calendar(&body) {
            Ok(parsed) => Ok(parsed.into()),
            Err(e) => {
                error!(error = %e, path = %self.path.display(), "ICS parse error");
                Err(CalendarError::Api(format!("ICS parse error: {}", e)))
            }
        }
    }

    /// Write through a temp file so readers never see a half-written calendar.
    fn save(&self, calendar: &icalendar::Calendar) -> Result<(), CalendarError> {
        let temp = self.path.with_extension("ics.tmp");
        fs::write(&temp, calendar.to_string())
            .and_then(|_| fs::rename(&temp, &self.path))
            .map_err(|e| CalendarError::Api(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}

impl CalendarStore for IcsFileCalendar {
    #[instrument(level = "info", skip(self), fields(path = %self.path.display()))]
    fn list_events(&self, time_min: DateTime<Utc>, time_max: DateTime<Utc>) -> Result<Vec<CalendarEvent>, CalendarError> {
        let calendar = self.load()?;
        let mut events = Vec::new();
        for comp in &calendar.components {
            if let icalendar::CalendarComponent::Event(e) = comp {
                let Some(id) = e.get_uid() else { continue };
                // Events without a readable start are never in a window.
                let Some(start) = e.property_value("DTSTART").and_then(parse_dt).map(|naive| naive.and_utc()) else {
                    continue;
                };
                if start < time_min || start >= time_max {
                    continue;
                }
                events.push(CalendarEvent {
                    id: id.to_string(),
                    summary: unescape_text(e.property_value("SUMMARY").unwrap_or("")),
                    location: unescape_text(e.property_value("LOCATION").unwrap_or("")),
                    description: unescape_text(e.property_value("DESCRIPTION").unwrap_or("")),
                    start: Some(start),
                });
            }
        }
        Ok(events)
    }

    #[instrument(level = "info", skip(self, event), fields(summary = %event.summary))]
    fn create_event(&self, event: &NewEvent) -> Result<String, CalendarError> {
        let mut calendar = self.load()?;
        let uid = uuid::Uuid::new_v4().to_string();
        let ics_event = icalendar::Event::new()
            .uid(&uid)
            .summary(&event.summary)
            .location(&event.location)
            .description(&event.description)
            .starts(event.start.with_timezone(&Utc))
            .ends(event.end.with_timezone(&Utc))
            .done();
        calendar.push(ics_event);
        self.save(&calendar)?;
        info!(event_id = %uid, "Created ICS event");
        Ok(uid)
    }

    #[instrument(level = "info", skip(self))]
    fn delete_event(&self, event_id: &str) -> Result<(), CalendarError> {
        let mut calendar = self.load()?;
        let before = calendar.components.len();
        calendar.components.retain(|comp| match comp {
            icalendar::CalendarComponent::Event(e) => e.get_uid() != Some(event_id),
            _ => true,
        });
        if calendar.components.len() == before {
            info!(event_id, "ICS event already gone");
            return Ok(());
        }
        self.save(&calendar)
    }
}

fn parse_dt(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    // Stored as UTC with a trailing Z
    let s2 = s.strip_suffix('Z').unwrap_or(s);
    for pat in ["%Y%m%dT%H%M%S", "%Y%m%dT%H%M"].iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s2, pat) {
            return Some(dt);
        }
    }
    // All-day dates (no time)
    if let Ok(date) = chrono::NaiveDate::parse_from_str(s2, "%Y%m%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    None
}

fn unescape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
