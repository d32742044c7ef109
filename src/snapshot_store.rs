use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, instrument, warn};

use crate::error::PersistenceError;
use crate::model::snapshot::Snapshot;

/// Durable home of the last successfully synced snapshot.
pub trait SnapshotStore {
    /// The stored snapshot, or an empty one when nothing usable is stored.
    fn load(&self) -> Snapshot;

    /// Replace the stored snapshot as a whole.
    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
}

/// Snapshot kept as a pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    #[instrument(level = "info", skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Snapshot {
        let body = match fs::read_to_string(&self.path) {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No stored snapshot yet");
                return Snapshot::default();
            }
            Err(e) => {
                warn!(error = %e, "Stored snapshot unreadable, starting from empty");
                return Snapshot::default();
            }
        };
        match serde_json::from_str::<Snapshot>(&body) {
            Ok(snapshot) => {
                info!(games = snapshot.len(), "Loaded stored snapshot");
                snapshot
            }
            Err(e) => {
                warn!(error = %e, "Stored snapshot corrupt, starting from empty");
                Snapshot::default()
            }
        }
    }

    #[instrument(level = "info", skip(self, snapshot), fields(path = %self.path.display(), games = snapshot.len()))]
    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let body = serde_json::to_string_pretty(snapshot)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let mut temp_name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        temp_name.push(".tmp");
        let temp = self.path.with_file_name(temp_name);

        let result = fs::write(&temp, body).and_then(|_| fs::rename(&temp, &self.path));
        if let Err(e) = result {
            error!(error = %e, "Failed to save snapshot");
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }
        info!("Saved snapshot");
        Ok(())
    }
}
