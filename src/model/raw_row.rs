use serde::{Deserialize, Serialize};

/// One row of the portal's assignment table, as trimmed text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGameRow {
    #[serde(default)]
    pub league: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub guest_team: String,
    #[serde(default)]
    pub address: String,
}

// Column layout of the games table: league, round, date, weekday, time, home, guest, address.
const COL_LEAGUE: usize = 0;
const COL_DATE: usize = 2;
const COL_TIME: usize = 4;
const COL_HOME: usize = 5;
const COL_GUEST: usize = 6;
const COL_ADDRESS: usize = 7;
const MIN_CELLS: usize = 6;

impl RawGameRow {
    /// Build a row from the cell texts of one table row.
    /// Returns None for padding rows and rows missing the essentials.
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Option<Self> {
        if cells.len() < MIN_CELLS {
            return None;
        }
        if cells.iter().all(|c| c.as_ref().trim().is_empty()) {
            return None;
        }

        let cell = |idx: usize| cells.get(idx).map(|c| c.as_ref().trim().to_string()).unwrap_or_default();
        let row = RawGameRow {
            league: cell(COL_LEAGUE),
            date: cell(COL_DATE),
            time: cell(COL_TIME),
            home_team: cell(COL_HOME),
            guest_team: cell(COL_GUEST),
            address: cell(COL_ADDRESS),
        };
        row.is_complete().then_some(row)
    }

    /// League, date and time are required, plus at least one team.
    pub fn is_complete(&self) -> bool {
        !self.league.trim().is_empty()
            && !self.date.trim().is_empty()
            && !self.time.trim().is_empty()
            && !(self.home_team.trim().is_empty() && self.guest_team.trim().is_empty())
    }
}
