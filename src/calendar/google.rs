use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{error, info, info_span, instrument};

use crate::calendar::CalendarStore;
use crate::error::CalendarError;
use crate::model::event::{CalendarEvent, NewEvent};

const API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const PAGE_SIZE: &str = "2500";

/// Google Calendar REST client bound to one calendar and one access token.
#[derive(Debug, Clone)]
pub struct GoogleCalendar {
    access_token: String,
    calendar_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsPage {
    #[serde(default)]
    items: Vec<GoogleEvent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleEvent {
    id: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    description: String,
    start: Option<GoogleEventTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEventTime {
    date_time: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedEvent {
    id: String,
}

impl GoogleCalendar {
    /// Build a client. A blank token means there is no calendar grant.
    pub fn new(access_token: impl Into<String>, calendar_id: impl Into<String>) -> Result<Self, CalendarError> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(CalendarError::Unavailable("no Google access token".to_string()));
        }
        let calendar_id = calendar_id.into();
        let calendar_id = if calendar_id.trim().is_empty() { "primary".to_string() } else { calendar_id };
        Ok(Self { access_token, calendar_id })
    }

    /// Collection URL. Calendar ids may contain `#` and `@`, so they are percent-encoded.
    pub fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", API_BASE, urlencoding::encode(&self.calendar_id))
    }

    pub fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url(), urlencoding::encode(event_id))
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Parse one page of an `events.list` response (no network).
    pub fn parse_event_page(body: &str) -> Result<(Vec<CalendarEvent>, Option<String>), CalendarError> {
        let page: EventsPage = serde_json::from_str(body)
            .map_err(|e| CalendarError::Api(format!("Failed to parse event list: {}", e)))?;
        let events = page.items.into_iter().map(to_calendar_event).collect();
        Ok((events, page.next_page_token))
    }
}

impl CalendarStore for GoogleCalendar {
    #[instrument(level = "info", skip(self), fields(calendar = %self.calendar_id))]
    fn list_events(&self, time_min: DateTime<Utc>, time_max: DateTime<Utc>) -> Result<Vec<CalendarEvent>, CalendarError> {
        let url = self.events_url();
        let time_min_s = time_min.to_rfc3339();
        let time_max_s = time_max.to_rfc3339();
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = ureq::get(&url)
                .header("Authorization", &self.bearer())
                .query("timeMin", &time_min_s)
                .query("timeMax", &time_max_s)
                .query("singleEvents", "true")
                .query("maxResults", PAGE_SIZE);
            if let Some(token) = page_token.as_deref() {
                request = request.query("pageToken", token);
            }

            let response = {
                let _span = info_span!("google_list_page", url = %url).entered();
                request.call().map_err(map_ureq_error)?
            };
            let body = response
                .into_body()
                .read_to_string()
                .map_err(|e| CalendarError::Api(format!("Failed to read event list: {}", e)))?;
            let (mut page, next) = Self::parse_event_page(&body)?;
            events.append(&mut page);

            match next {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        info!(count = events.len(), "Listed calendar events");
        Ok(events)
    }

    #[instrument(level = "info", skip(self, event), fields(summary = %event.summary))]
    fn create_event(&self, event: &NewEvent) -> Result<String, CalendarError> {
        let tz_name = event.start.timezone().name().to_string();
        let payload = serde_json::json!({
            "summary": event.summary,
            "location": event.location,
            "description": event.description,
            "start": { "dateTime": event.start.fixed_offset().to_rfc3339(), "timeZone": tz_name },
            "end": { "dateTime": event.end.fixed_offset().to_rfc3339(), "timeZone": tz_name },
        });

        let response = ureq::post(&self.events_url())
            .header("Authorization", &self.bearer())
            .send_json(payload)
            .map_err(map_ureq_error)?;
        let created: CreatedEvent = response
            .into_body()
            .read_json()
            .map_err(|e| CalendarError::Api(format!("Failed to read created event: {}", e)))?;
        info!(event_id = %created.id, "Created calendar event");
        Ok(created.id)
    }

    #[instrument(level = "info", skip(self))]
    fn delete_event(&self, event_id: &str) -> Result<(), CalendarError> {
        let url = self.event_url(event_id);
        match ureq::delete(&url).header("Authorization", &self.bearer()).call() {
            Ok(_) => Ok(()),
            Err(ureq::Error::StatusCode(404 | 410)) => {
                info!(event_id, "Calendar event already gone");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, event_id, "Failed to delete calendar event");
                Err(map_ureq_error(e))
            }
        }
    }
}

fn to_calendar_event(item: GoogleEvent) -> CalendarEvent {
    let start = item.start.as_ref().and_then(|t| {
        t.date_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                t.date
                    .as_deref()
                    .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|naive| naive.and_utc())
            })
    });
    CalendarEvent {
        id: item.id,
        summary: item.summary,
        location: item.location,
        description: item.description,
        start,
    }
}

fn map_ureq_error(e: ureq::Error) -> CalendarError {
    match e {
        ureq::Error::StatusCode(401 | 403) => CalendarError::Unavailable(format!("access denied: {}", e)),
        other => CalendarError::Api(other.to_string()),
    }
}
