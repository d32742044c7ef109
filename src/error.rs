use thiserror::Error;

/// Failures while fetching the referee's assignments from the portal.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Invalid portal credentials: {0}")]
    InvalidCredentials(String),

    #[error("Portal unreachable: {0}")]
    Unreachable(String),

    #[error("Scrape timed out: {0}")]
    Timeout(String),

    #[error("Unexpected scrape response: {0}")]
    Response(String),
}

/// Failures talking to the calendar store.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// No usable access grant; the resync step is skipped.
    #[error("Calendar unavailable: {0}")]
    Unavailable(String),

    /// A single list/create/delete call failed.
    #[error("Calendar API error: {0}")]
    Api(String),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Snapshot IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that fail a whole sync run.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Missing referee credentials")]
    MissingCredentials,

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
