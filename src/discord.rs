use tracing::{error, info};

use crate::model::game::GameRecord;
use crate::model::schedule::add_hours_wrapping;
use crate::sync::SyncReport;

/// Simple Discord webhook client encapsulating the hook URL.
#[derive(Debug, Clone)]
pub struct Discord {
    hook_url: String,
}

impl Discord {
    /// Create a new Discord client with the provided webhook URL.
    pub fn new(hook_url: String) -> Self {
        Self { hook_url }
    }

    /// Post a simple text message to the webhook URL.
    /// Returns Ok(()) on success, or Err(String) with a description on failure.
    pub fn post(&self, content: &str) -> Result<(), String> {
        let payload = serde_json::json!({ "content": content });
        match ureq::post(&self.hook_url).send_json(payload) {
            Ok(resp) => {
                info!(status = resp.status().as_u16(), "Posted message to Discord webhook");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to post to Discord webhook");
                Err(format!("Failed to post to Discord webhook: {}", e))
            }
        }
    }

    /// Post the summary of a finished sync.
    pub fn post_report(&self, report: &SyncReport, game_duration_hours: u32) -> Result<(), String> {
        self.post(&format_report(report, game_duration_hours))
    }
}

/// Human-readable summary of a sync: counts, then the added and removed games.
pub fn format_report(report: &SyncReport, game_duration_hours: u32) -> String {
    let mut out = format!(
        ":basketball: Schedule sync: {} added, {} updated, {} removed, {} unchanged",
        report.added, report.updated, report.removed, report.unchanged
    );

    if report.calendar_synced {
        out.push_str(&format!(
            "\n:calendar: Calendar: {} events replaced, {} created",
            report.deleted_events, report.created_events
        ));
        if report.failed_events > 0 {
            out.push_str(&format!(" ({} failed)", report.failed_events));
        }
    } else {
        out.push_str("\n:warning: Calendar not connected, games saved locally only");
    }

    let sections = [("New games", &report.changes.added), ("Updated games", &report.changes.updated), ("Removed games", &report.changes.removed)];
    for (title, games) in sections {
        if games.is_empty() {
            continue;
        }
        out.push_str(&format!("\n**{}:**", title));
        for game in games.iter() {
            out.push('\n');
            out.push_str(&game_line(game, game_duration_hours));
        }
    }

    if !report.changes.has_changes() {
        out.push_str("\nNo changes in assigned games");
    }
    out
}

fn game_line(game: &GameRecord, game_duration_hours: u32) -> String {
    let end = add_hours_wrapping(&game.time, game_duration_hours).unwrap_or_default();
    let mut line = format!("- {} | {} {}", game.summary(), game.date, game.time);
    if !end.is_empty() {
        line.push('-');
        line.push_str(&end);
    }
    if !game.address.is_empty() {
        line.push_str(" | ");
        line.push_str(&game.address);
    }
    line
}
