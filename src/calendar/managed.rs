//! Deciding which calendar events this service owns.
//!
//! The calendar is shared with the referee's personal entries, so only events that look like
//! ours may be deleted. Newer events carry [`SYNC_MARKER`] in their description; older ones are
//! recognised by their summary shape or by a venue word in the location.

use crate::model::event::CalendarEvent;

/// Description line written into every event this service creates.
pub const SYNC_MARKER: &str = "Synced by referee-calendar-sync";

/// Venue words (hall, arena, court, sports, basketball, community centre) seen in portal addresses.
pub const VENUE_KEYWORDS: &[&str] = &["אולם", "היכל", "מגרש", "ספורט", "כדורסל", "מתנ\"ס"];

pub fn is_managed(event: &CalendarEvent) -> bool {
    has_marker(event) || looks_like_game_summary(&event.summary) || (has_venue_keyword(&event.location) && event.summary.contains('-'))
}

fn has_marker(event: &CalendarEvent) -> bool {
    event.description.lines().any(|line| line.trim() == SYNC_MARKER)
}

/// `"<home> - <guest> [<league>]"`: a dash-separated pair followed by a bracketed suffix.
pub fn looks_like_game_summary(summary: &str) -> bool {
    let summary = summary.trim();
    let Some(body) = summary.strip_suffix(']') else {
        return false;
    };
    let Some(open) = body.rfind('[') else {
        return false;
    };
    let (teams, league) = (body[..open].trim_end(), &body[open + 1..]);
    if league.trim().is_empty() {
        return false;
    }
    match teams.split_once(" - ") {
        Some((home, guest)) => !home.trim().is_empty() && !guest.trim().is_empty(),
        None => false,
    }
}

fn has_venue_keyword(location: &str) -> bool {
    VENUE_KEYWORDS.iter().any(|kw| location.contains(kw))
}
