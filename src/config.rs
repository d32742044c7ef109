use std::env;
use std::path::PathBuf;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_TIMEZONE: &str = "Asia/Jerusalem";
pub const DEFAULT_SNAPSHOT_PATH: &str = "games-data.json";

/// Tunables for a sync run. Every field has a default so a partial payload deserializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// IANA zone the portal's dates and times are expressed in.
    pub timezone: String,
    pub game_duration_hours: u32,
    /// Extra days appended to the calendar listing window to absorb timezone skew.
    pub trailing_buffer_days: u32,
    /// Window length used when the snapshot has no datable games.
    pub default_window_days: u32,
    pub snapshot_path: PathBuf,
    pub scrape_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            game_duration_hours: 2,
            trailing_buffer_days: 7,
            default_window_days: 365,
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            scrape_timeout_secs: 120,
        }
    }
}

impl Settings {
    /// Defaults, overridden by `SNAPSHOT_PATH` and `SYNC_TIMEZONE` when set.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(path) = env::var("SNAPSHOT_PATH") {
            if !path.trim().is_empty() {
                settings.snapshot_path = PathBuf::from(path);
            }
        }
        if let Ok(tz) = env::var("SYNC_TIMEZONE") {
            if !tz.trim().is_empty() {
                settings.timezone = tz;
            }
        }
        settings
    }

    /// Resolve the configured zone, falling back to the portal's home zone on a bad name.
    pub fn tz(&self) -> Tz {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(e) => {
                warn!(timezone = %self.timezone, error = %e, "Unknown timezone, using default");
                chrono_tz::Asia::Jerusalem
            }
        }
    }
}
