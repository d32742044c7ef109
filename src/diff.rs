use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::game::GameRecord;
use crate::model::snapshot::Snapshot;

/// What changed between the stored snapshot and a fresh scrape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub added: Vec<GameRecord>,
    pub removed: Vec<GameRecord>,
    /// Current field values, with the previous `calendarEventId`.
    pub updated: Vec<GameRecord>,
    /// Current field values, with the previous `calendarEventId`.
    pub unchanged: Vec<GameRecord>,
}

impl ChangeSet {
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty())
    }
}

/// Compare two snapshots by natural key. Pure; output order follows the inputs.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> ChangeSet {
    // First occurrence wins if a snapshot ever holds a repeated key.
    let mut previous_by_key: HashMap<String, &GameRecord> = HashMap::with_capacity(previous.len());
    for game in previous.games() {
        previous_by_key.entry(game.natural_key()).or_insert(game);
    }
    let current_keys: HashSet<String> = current.games().iter().map(GameRecord::natural_key).collect();

    let mut changes = ChangeSet::default();

    for game in current.games() {
        match previous_by_key.get(&game.natural_key()) {
            None => changes.added.push(game.clone()),
            Some(prior) => {
                let mut carried = game.clone();
                carried.calendar_event_id = prior.calendar_event_id.clone();
                if game.schedule_differs(prior) {
                    changes.updated.push(carried);
                } else {
                    changes.unchanged.push(carried);
                }
            }
        }
    }

    changes.removed = previous
        .games()
        .iter()
        .filter(|g| !current_keys.contains(&g.natural_key()))
        .cloned()
        .collect();

    changes
}
