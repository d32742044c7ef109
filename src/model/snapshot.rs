use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::game::GameRecord;
use crate::model::raw_row::RawGameRow;

/// All games assigned as of one scrape, in portal order. Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    games: Vec<GameRecord>,
}

impl Snapshot {
    /// Wrap records, dropping any whose natural key repeats an earlier one.
    pub fn new(games: Vec<GameRecord>) -> Self {
        let mut seen: HashSet<String> = HashSet::with_capacity(games.len());
        let mut unique = Vec::with_capacity(games.len());
        for game in games {
            let key = game.natural_key();
            if seen.insert(key) {
                unique.push(game);
            } else {
                warn!(game_id = %game.id, date = %game.date, time = %game.time, "Dropping duplicate game in snapshot");
            }
        }
        Self { games: unique }
    }

    /// Normalize scraped rows, skipping incomplete ones.
    pub fn from_rows(rows: &[RawGameRow]) -> Self {
        let games = rows
            .iter()
            .filter(|row| row.is_complete())
            .enumerate()
            .map(|(idx, row)| GameRecord::from_raw(idx, row))
            .collect();
        Self::new(games)
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    pub fn into_games(self) -> Vec<GameRecord> {
        self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Earliest and latest parsable game dates, or None when no game has a valid date.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.games.iter().filter_map(GameRecord::game_date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Copy `calendarEventId` from the matching game (by natural key) in `previous`
    /// onto games that have none yet.
    pub fn carry_forward_event_ids(&mut self, previous: &Snapshot) {
        let prior: HashMap<String, &str> = previous
            .games
            .iter()
            .filter_map(|g| g.calendar_event_id.as_deref().map(|id| (g.natural_key(), id)))
            .collect();
        for game in self.games.iter_mut().filter(|g| g.calendar_event_id.is_none()) {
            if let Some(id) = prior.get(&game.natural_key()) {
                game.calendar_event_id = Some((*id).to_string());
            }
        }
    }

    /// Replace every game's `calendarEventId`, position by position.
    pub fn set_event_ids(&mut self, ids: Vec<Option<String>>) {
        for (game, id) in self.games.iter_mut().zip(ids) {
            game.calendar_event_id = id;
        }
    }
}
