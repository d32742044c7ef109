use chrono::{DateTime, Utc};
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::calendar::{CalendarStore, GoogleCalendar, IcsFileCalendar};
use crate::config::Settings;
use crate::discord::Discord;
use crate::error::{ScrapeError, SyncError};
use crate::model::game::GameRecord;
use crate::portal::{Credentials, DemoScraper, RemoteScraper, Scraper};
use crate::snapshot_store::{JsonFileSnapshotStore, SnapshotStore};
use crate::sync::{SyncOrchestrator, SyncReport};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Test,
    Production,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Sync,
    Snapshot,
}

/// Google Calendar grant passed in by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarAccess {
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub mode: Mode,
    #[serde(default)]
    pub action: Action,
    #[serde(default)]
    pub credentials: Option<Credentials>,
    #[serde(default)]
    pub scrape_url: String,
    #[serde(default)]
    pub calendar: Option<CalendarAccess>,
    /// Local `.ics` file to mirror into when no Google grant is given.
    #[serde(default)]
    pub ics_path: Option<String>,
    #[serde(default)]
    pub discord_hook_url: Option<String>,
    #[serde(default)]
    pub settings: Option<Settings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<SyncReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub games: Option<Vec<GameRecord>>,
}

#[instrument(skip(event))]
pub async fn handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    let payload = event.payload;
    // ureq is blocking; keep it off the async runtime threads.
    let joined = tokio::task::spawn_blocking(move || process(payload, Utc::now())).await;
    match joined {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(e)) => {
            error!(error = %e, "Sync failed");
            Err(e.into())
        }
        Err(e) => {
            error!(error = %e, "Sync task join error");
            Err(e.into())
        }
    }
}

/// Serve one request synchronously. `now` anchors the default calendar window.
pub fn process(request: Request, now: DateTime<Utc>) -> Result<Response, SyncError> {
    let settings = request.settings.clone().unwrap_or_else(Settings::from_env);
    let snapshots = JsonFileSnapshotStore::new(settings.snapshot_path.clone());

    match request.action {
        Action::Snapshot => {
            let games = snapshots.load().into_games();
            Ok(Response { message: format!("{} stored games", games.len()), report: None, games: Some(games) })
        }
        Action::Sync => {
            let credentials = request.credentials.clone().ok_or(SyncError::MissingCredentials)?;
            let scraper = scraper_for(&request, &settings)?;
            let calendar = calendar_for(&request);

            let orchestrator = SyncOrchestrator::new(scraper.as_ref(), calendar.as_deref(), &snapshots, &settings);
            let report = orchestrator.run_sync(&credentials, now)?;

            if let Some(hook) = request.discord_hook_url.as_deref().filter(|h| !h.trim().is_empty()) {
                if let Err(e) = Discord::new(hook.to_string()).post_report(&report, settings.game_duration_hours) {
                    error!(error = %e, "Failed to post sync summary to Discord");
                }
            }

            let message = format!(
                "Sync complete: {} added, {} updated, {} removed; calendar {}",
                report.added,
                report.updated,
                report.removed,
                if report.calendar_synced {
                    format!("synced ({} deleted, {} created)", report.deleted_events, report.created_events)
                } else {
                    "skipped".to_string()
                }
            );
            info!(message = %message, "Prepared sync response");
            Ok(Response { message, report: Some(report), games: None })
        }
    }
}

fn scraper_for(request: &Request, settings: &Settings) -> Result<Box<dyn Scraper>, SyncError> {
    match request.mode {
        Mode::Test => Ok(Box::new(DemoScraper)),
        Mode::Production => {
            if request.scrape_url.trim().is_empty() {
                return Err(ScrapeError::Unreachable("no scrape endpoint configured".to_string()).into());
            }
            Ok(Box::new(RemoteScraper::new(request.scrape_url.clone(), settings.scrape_timeout_secs)))
        }
    }
}

/// Google when a token is given, else the local ICS file, else no calendar.
fn calendar_for(request: &Request) -> Option<Box<dyn CalendarStore>> {
    if let Some(access) = &request.calendar {
        match GoogleCalendar::new(access.access_token.clone(), access.calendar_id.clone()) {
            Ok(google) => return Some(Box::new(google)),
            Err(e) => warn!(error = %e, "Google Calendar grant unusable"),
        }
    }
    request
        .ics_path
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(|p| Box::new(IcsFileCalendar::new(p)) as Box<dyn CalendarStore>)
}
