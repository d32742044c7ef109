//! Full resync of the calendar from a snapshot.
//!
//! Every run deletes all managed events in the snapshot's date window and then creates one event
//! per game. Nothing depends on previously recorded event ids, so duplicates and orphans left by
//! an earlier partial run are cleaned up by the next complete one.
//!
//! A run stopped between the delete and create phases leaves the window without some games until
//! the next run; there is no staging area or rollback.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::calendar::CalendarStore;
use crate::calendar::managed::{SYNC_MARKER, is_managed};
use crate::config::Settings;
use crate::error::CalendarError;
use crate::model::event::NewEvent;
use crate::model::game::GameRecord;
use crate::model::snapshot::Snapshot;

/// Counts and resulting event ids from one resync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResyncOutcome {
    pub deleted: usize,
    pub created: usize,
    /// Deletes and creates that failed (or games that could not be placed on the calendar).
    pub failed: usize,
    /// New event id per snapshot game, in snapshot order; None where creation failed.
    pub event_ids: Vec<Option<String>>,
}

/// Half-open UTC window used to list calendar events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SyncWindow {
    /// From the first to the last game day of the snapshot, plus the trailing buffer.
    /// An empty (or undatable) snapshot covers today through `default_window_days`.
    /// Day counts past the end of the calendar clamp to the last representable date.
    pub fn for_snapshot(snapshot: &Snapshot, settings: &Settings, now: DateTime<Utc>) -> Self {
        let tz = settings.tz();
        let (first, last) = snapshot.date_span().unwrap_or_else(|| {
            let today = now.with_timezone(&tz).date_naive();
            (today, add_days_clamped(today, u64::from(settings.default_window_days)))
        });
        let start = local_midnight(first, tz);
        let end = local_midnight(add_days_clamped(last, 1 + u64::from(settings.trailing_buffer_days)), tz);
        Self { start, end }
    }
}

fn add_days_clamped(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or_else(|| {
        warn!(%date, days, "Window end out of range, clamping");
        NaiveDate::MAX
    })
}

fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Drives delete-then-recreate against one calendar store.
pub struct ResyncEngine<'a, S: CalendarStore + ?Sized> {
    store: &'a S,
    settings: &'a Settings,
}

impl<'a, S: CalendarStore + ?Sized> ResyncEngine<'a, S> {
    pub fn new(store: &'a S, settings: &'a Settings) -> Self {
        Self { store, settings }
    }

    /// Make the calendar's managed events mirror `snapshot`.
    ///
    /// Fails only when the calendar cannot be listed; individual delete/create failures are
    /// logged, counted and skipped.
    #[instrument(level = "info", skip_all, fields(games = snapshot.len()))]
    pub fn resync(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> Result<ResyncOutcome, CalendarError> {
        let window = SyncWindow::for_snapshot(snapshot, self.settings, now);
        info!(start = %window.start, end = %window.end, "Listing calendar events");

        let listed = self.store.list_events(window.start, window.end)?;
        let listed_count = listed.len();
        let managed: Vec<_> = listed.into_iter().filter(is_managed).collect();
        info!(listed = listed_count, managed = managed.len(), "Filtered managed events");

        let mut outcome = ResyncOutcome::default();

        for event in &managed {
            match self.store.delete_event(&event.id) {
                Ok(()) => outcome.deleted += 1,
                Err(e) => {
                    error!(error = %e, event_id = %event.id, summary = %event.summary, "Failed to delete managed event");
                    outcome.failed += 1;
                }
            }
        }

        let tz = self.settings.tz();
        outcome.event_ids.reserve(snapshot.len());
        for game in snapshot.games() {
            let Some(new_event) = self.event_for(game, tz) else {
                warn!(game_id = %game.id, date = %game.date, time = %game.time, "Game has no valid start time, not placed on calendar");
                outcome.failed += 1;
                outcome.event_ids.push(None);
                continue;
            };
            match self.store.create_event(&new_event) {
                Ok(id) => {
                    outcome.created += 1;
                    outcome.event_ids.push(Some(id));
                }
                Err(e) => {
                    error!(error = %e, game_id = %game.id, summary = %new_event.summary, "Failed to create calendar event");
                    outcome.failed += 1;
                    outcome.event_ids.push(None);
                }
            }
        }

        info!(deleted = outcome.deleted, created = outcome.created, failed = outcome.failed, "Calendar resync finished");
        Ok(outcome)
    }

    fn event_for(&self, game: &GameRecord, tz: Tz) -> Option<NewEvent> {
        let (start, end) = game.window(tz, self.settings.game_duration_hours)?;
        Some(NewEvent {
            summary: game.summary(),
            location: game.address.clone(),
            description: SYNC_MARKER.to_string(),
            start,
            end,
        })
    }
}
