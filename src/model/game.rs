use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::model::names::{extract_league_name, extract_team_name};
use crate::model::raw_row::RawGameRow;
use crate::model::schedule;

const KEY_SEPARATOR: char = '|';

/// One assigned game. Field names on disk match the historical `games-data.json` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Per-scrape sequential id (`game_<n>`); not stable across scrapes.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub league: String,
    #[serde(default)]
    pub league_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(rename = "homeTeam", default)]
    pub home_team_raw: String,
    #[serde(rename = "guestTeam", default)]
    pub guest_team_raw: String,
    #[serde(default)]
    pub home_team_name: String,
    #[serde(default)]
    pub guest_team_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_event_id: Option<String>,
}

impl GameRecord {
    /// Normalize a scraped row. `index` is the 0-based position in the scrape.
    pub fn from_raw(index: usize, raw: &RawGameRow) -> Self {
        Self {
            id: format!("game_{}", index + 1),
            league: raw.league.trim().to_string(),
            league_name: extract_league_name(&raw.league),
            date: raw.date.trim().to_string(),
            time: raw.time.trim().to_string(),
            home_team_raw: raw.home_team.trim().to_string(),
            guest_team_raw: raw.guest_team.trim().to_string(),
            home_team_name: extract_team_name(&raw.home_team),
            guest_team_name: extract_team_name(&raw.guest_team),
            address: raw.address.trim().to_string(),
            calendar_event_id: None,
        }
    }

    /// Identity across scrapes: date, time, and both raw team strings.
    pub fn natural_key(&self) -> String {
        let mut key = String::with_capacity(
            self.date.len() + self.time.len() + self.home_team_raw.len() + self.guest_team_raw.len() + 3,
        );
        key.push_str(&self.date);
        key.push(KEY_SEPARATOR);
        key.push_str(&self.time);
        key.push(KEY_SEPARATOR);
        key.push_str(&self.home_team_raw);
        key.push(KEY_SEPARATOR);
        key.push_str(&self.guest_team_raw);
        key
    }

    /// True when the schedule-relevant raw fields differ (derived names are ignored).
    pub fn schedule_differs(&self, other: &GameRecord) -> bool {
        self.date != other.date || self.time != other.time || self.address != other.address || self.league != other.league
    }

    /// Calendar summary: `"<home> - <guest> [<league>]"`.
    pub fn summary(&self) -> String {
        let home = non_empty_or(&self.home_team_name, &self.home_team_raw);
        let guest = non_empty_or(&self.guest_team_name, &self.guest_team_raw);
        let league = non_empty_or(&self.league_name, &self.league);
        format!("{} - {} [{}]", home, guest, league)
    }

    pub fn game_date(&self) -> Option<NaiveDate> {
        schedule::parse_game_date(&self.date)
    }

    pub fn window(&self, tz: Tz, duration_hours: u32) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
        schedule::game_window(&self.date, &self.time, tz, duration_hours)
    }
}

fn non_empty_or<'a>(preferred: &'a str, fallback: &'a str) -> &'a str {
    if preferred.trim().is_empty() { fallback } else { preferred }
}
