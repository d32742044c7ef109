use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::calendar::CalendarStore;
use crate::config::Settings;
use crate::diff::{ChangeSet, diff};
use crate::error::SyncError;
use crate::model::snapshot::Snapshot;
use crate::portal::{Credentials, Scraper};
use crate::resync::ResyncEngine;
use crate::snapshot_store::SnapshotStore;

/// Coarse checkpoints of a run, for progress display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStage {
    RequestSent,
    DataReceived,
    DiffComputed,
    CalendarUpdated,
    SnapshotPersisted,
}

impl SyncStage {
    pub fn percent(self) -> u8 {
        match self {
            SyncStage::RequestSent => 10,
            SyncStage::DataReceived => 90,
            SyncStage::DiffComputed => 95,
            SyncStage::CalendarUpdated => 98,
            SyncStage::SnapshotPersisted => 100,
        }
    }
}

pub trait ProgressSink {
    fn report(&self, stage: SyncStage);
}

impl<F: Fn(SyncStage)> ProgressSink for F {
    fn report(&self, stage: SyncStage) {
        self(stage)
    }
}

/// Progress sink that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, stage: SyncStage) {
        info!(stage = ?stage, percent = stage.percent(), "Sync progress");
    }
}

/// Result of one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
    pub deleted_events: usize,
    pub created_events: usize,
    /// Calendar calls that failed during the resync.
    pub failed_events: usize,
    pub calendar_synced: bool,
    pub changes: ChangeSet,
}

/// Runs scrape, diff, calendar resync and persistence in order.
pub struct SyncOrchestrator<'a> {
    scraper: &'a dyn Scraper,
    calendar: Option<&'a dyn CalendarStore>,
    snapshots: &'a dyn SnapshotStore,
    settings: &'a Settings,
    progress: &'a dyn ProgressSink,
}

impl<'a> SyncOrchestrator<'a> {
    /// `calendar` is None when there is no calendar write access.
    pub fn new(
        scraper: &'a dyn Scraper,
        calendar: Option<&'a dyn CalendarStore>,
        snapshots: &'a dyn SnapshotStore,
        settings: &'a Settings,
    ) -> Self {
        Self { scraper, calendar, snapshots, settings, progress: &LogProgress }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    /// Run one sync. Callers must not run two syncs against the same snapshot store at once.
    ///
    /// The snapshot is written only after the scrape and the calendar step, so a scrape failure
    /// leaves the stored snapshot untouched.
    #[instrument(level = "info", skip(self, now))]
    pub fn run_sync(&self, credentials: &Credentials, now: DateTime<Utc>) -> Result<SyncReport, SyncError> {
        if credentials.is_blank() {
            return Err(SyncError::MissingCredentials);
        }

        let previous = self.snapshots.load();

        self.progress.report(SyncStage::RequestSent);
        let rows = self.scraper.scrape(credentials).map_err(|e| {
            error!(error = %e, "Scrape failed, keeping stored snapshot");
            e
        })?;
        self.progress.report(SyncStage::DataReceived);

        let mut current = Snapshot::from_rows(&rows);
        let changes = diff(&previous, &current);
        current.carry_forward_event_ids(&previous);
        info!(
            games = current.len(),
            added = changes.added.len(),
            updated = changes.updated.len(),
            removed = changes.removed.len(),
            unchanged = changes.unchanged.len(),
            "Computed schedule changes"
        );
        self.progress.report(SyncStage::DiffComputed);

        let mut report = SyncReport {
            added: changes.added.len(),
            updated: changes.updated.len(),
            removed: changes.removed.len(),
            unchanged: changes.unchanged.len(),
            ..SyncReport::default()
        };

        // Runs even with no schedule changes so leftovers from earlier runs get cleaned up.
        match self.calendar {
            Some(store) => match ResyncEngine::new(store, self.settings).resync(&current, now) {
                Ok(outcome) => {
                    report.deleted_events = outcome.deleted;
                    report.created_events = outcome.created;
                    report.failed_events = outcome.failed;
                    report.calendar_synced = true;
                    current.set_event_ids(outcome.event_ids);
                }
                Err(e) => warn!(error = %e, "Calendar not reachable, skipping calendar sync"),
            },
            None => info!("No calendar access, skipping calendar sync"),
        }
        self.progress.report(SyncStage::CalendarUpdated);

        self.snapshots.save(&current)?;
        self.progress.report(SyncStage::SnapshotPersisted);

        report.changes = changes;
        info!(
            added = report.added,
            updated = report.updated,
            removed = report.removed,
            deleted_events = report.deleted_events,
            created_events = report.created_events,
            calendar_synced = report.calendar_synced,
            "Sync finished"
        );
        Ok(report)
    }
}
