#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use referee_calendar_sync::calendar::CalendarStore;
use referee_calendar_sync::error::{CalendarError, PersistenceError, ScrapeError};
use referee_calendar_sync::model::event::{CalendarEvent, NewEvent};
use referee_calendar_sync::model::raw_row::RawGameRow;
use referee_calendar_sync::model::snapshot::Snapshot;
use referee_calendar_sync::portal::{Credentials, Scraper};
use referee_calendar_sync::snapshot_store::SnapshotStore;

/// In-memory calendar that records every call.
#[derive(Default)]
pub struct FakeCalendar {
    pub events: RefCell<BTreeMap<String, CalendarEvent>>,
    next_id: Cell<usize>,
    pub fail_list: Cell<bool>,
    /// Creates whose summary contains this text fail.
    pub fail_create_containing: RefCell<Option<String>>,
    /// Deleting this id fails and leaves the event in place.
    pub fail_delete_id: RefCell<Option<String>>,
    pub deletes: Cell<usize>,
    pub creates: Cell<usize>,
}

impl FakeCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: &str, summary: &str, location: &str, start: DateTime<Utc>) {
        self.events.borrow_mut().insert(
            id.to_string(),
            CalendarEvent {
                id: id.to_string(),
                summary: summary.to_string(),
                location: location.to_string(),
                description: String::new(),
                start: Some(start),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn summaries(&self) -> Vec<String> {
        self.events.borrow().values().map(|e| e.summary.clone()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.events.borrow().contains_key(id)
    }
}

impl CalendarStore for FakeCalendar {
    fn list_events(&self, time_min: DateTime<Utc>, time_max: DateTime<Utc>) -> Result<Vec<CalendarEvent>, CalendarError> {
        if self.fail_list.get() {
            return Err(CalendarError::Api("list failed".to_string()));
        }
        Ok(self
            .events
            .borrow()
            .values()
            .filter(|e| e.start.map(|s| s >= time_min && s < time_max).unwrap_or(true))
            .cloned()
            .collect())
    }

    fn create_event(&self, event: &NewEvent) -> Result<String, CalendarError> {
        if let Some(needle) = self.fail_create_containing.borrow().as_deref() {
            if event.summary.contains(needle) {
                return Err(CalendarError::Api("create failed".to_string()));
            }
        }
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        let id = format!("evt_{}", n);
        self.events.borrow_mut().insert(
            id.clone(),
            CalendarEvent {
                id: id.clone(),
                summary: event.summary.clone(),
                location: event.location.clone(),
                description: event.description.clone(),
                start: Some(event.start.with_timezone(&Utc)),
            },
        );
        self.creates.set(self.creates.get() + 1);
        Ok(id)
    }

    fn delete_event(&self, event_id: &str) -> Result<(), CalendarError> {
        if self.fail_delete_id.borrow().as_deref() == Some(event_id) {
            return Err(CalendarError::Api("delete failed".to_string()));
        }
        self.events.borrow_mut().remove(event_id);
        self.deletes.set(self.deletes.get() + 1);
        Ok(())
    }
}

/// Scraper returning fixed rows, or failing.
pub struct FakeScraper {
    pub rows: Vec<RawGameRow>,
    pub fail: bool,
}

impl FakeScraper {
    pub fn returning(rows: Vec<RawGameRow>) -> Self {
        Self { rows, fail: false }
    }

    pub fn failing() -> Self {
        Self { rows: Vec::new(), fail: true }
    }
}

impl Scraper for FakeScraper {
    fn scrape(&self, _credentials: &Credentials) -> Result<Vec<RawGameRow>, ScrapeError> {
        if self.fail {
            return Err(ScrapeError::Unreachable("portal down".to_string()));
        }
        Ok(self.rows.clone())
    }
}

/// Snapshot store in memory, optionally failing on save.
#[derive(Default)]
pub struct MemorySnapshotStore {
    pub stored: RefCell<Snapshot>,
    pub fail_save: bool,
    pub saves: Cell<usize>,
}

impl MemorySnapshotStore {
    pub fn with(snapshot: Snapshot) -> Self {
        Self { stored: RefCell::new(snapshot), fail_save: false, saves: Cell::new(0) }
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Snapshot {
        self.stored.borrow().clone()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        if self.fail_save {
            return Err(PersistenceError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")));
        }
        *self.stored.borrow_mut() = snapshot.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

pub fn row(league: &str, date: &str, time: &str, home: &str, guest: &str, address: &str) -> RawGameRow {
    RawGameRow {
        league: league.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        home_team: home.to_string(),
        guest_team: guest.to_string(),
        address: address.to_string(),
    }
}

pub fn game_one() -> RawGameRow {
    row("1 - ליגת על", "25/10/2026", "19:00", "1535 - בני הרצליה פנלינק", "17 - מכבי תל אביב פלייטיקה", "אולם היובל, הרצליה")
}

pub fn game_two() -> RawGameRow {
    row("101 - נוער על צפון", "27/10/2026", "20:30", "22 - אליצור עירוני נתניה", "17 - הפועל כפר סבא אביב", "ביה\"ס ישורון, נתניה")
}

pub fn game_three() -> RawGameRow {
    row("52 - לאומית נשים", "02/11/2026", "18:00", "8 - מכבי רעננה", "9 - הפועל כפר סבא", "היכל אביב, רעננה")
}

pub fn demo_credentials() -> Credentials {
    Credentials::new("12345", "secret")
}
