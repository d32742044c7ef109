use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, instrument};

use crate::error::ScrapeError;
use crate::model::raw_row::RawGameRow;

/// Referee numbers that run against the built-in demo schedule instead of the portal.
pub const DEMO_REF_NUMBERS: &[&str] = &["12345", "test123"];

/// Referee portal login.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub ref_number: String,
    pub password: String,
}

impl Credentials {
    pub fn new(ref_number: impl Into<String>, password: impl Into<String>) -> Self {
        Self { ref_number: ref_number.into(), password: password.into() }
    }

    pub fn is_blank(&self) -> bool {
        self.ref_number.trim().is_empty() || self.password.is_empty()
    }

    pub fn is_demo(&self) -> bool {
        DEMO_REF_NUMBERS.contains(&self.ref_number.trim())
    }
}

// Keep the password out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("ref_number", &self.ref_number).field("password", &"***").finish()
    }
}

/// Source of the referee's assigned games.
pub trait Scraper {
    fn scrape(&self, credentials: &Credentials) -> Result<Vec<RawGameRow>, ScrapeError>;
}

/// Client for a scrape service that logs into the portal and returns the games table.
///
/// Request: `POST {refNumber, password}`. Answer: `{success, games: [...]}` with row objects, or
/// `{success, rows: [[cell, ...], ...]}` with the raw table cells.
#[derive(Debug, Clone)]
pub struct RemoteScraper {
    endpoint: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    success: Option<bool>,
    #[serde(default)]
    games: Vec<RawGameRow>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
    error: Option<String>,
}

impl RemoteScraper {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self { endpoint: endpoint.into(), timeout: Duration::from_secs(timeout_secs) }
    }

    /// Decode a scrape service answer (no network).
    pub fn parse_response(body: &str) -> Result<Vec<RawGameRow>, ScrapeError> {
        let response: ScrapeResponse = serde_json::from_str(body)
            .map_err(|e| ScrapeError::Response(format!("Failed to deserialize scrape response: {}", e)))?;
        if response.success == Some(false) {
            let message = response.error.unwrap_or_else(|| "scrape service reported failure".to_string());
            return Err(ScrapeError::Response(message));
        }

        let mut rows: Vec<RawGameRow> = response.games.into_iter().filter(RawGameRow::is_complete).collect();
        rows.extend(response.rows.iter().filter_map(|cells| RawGameRow::from_cells(cells.as_slice())));
        Ok(rows)
    }
}

impl Scraper for RemoteScraper {
    #[instrument(level = "info", skip(self), fields(endpoint = %self.endpoint))]
    fn scrape(&self, credentials: &Credentials) -> Result<Vec<RawGameRow>, ScrapeError> {
        let config = ureq::Agent::config_builder().timeout_global(Some(self.timeout)).build();
        let agent = ureq::Agent::new_with_config(config);
        let payload = serde_json::json!({
            "refNumber": credentials.ref_number,
            "password": credentials.password,
        });

        let response_result = {
            let _span = info_span!("scrape_request", url = %self.endpoint).entered();
            agent.post(&self.endpoint).send_json(payload)
        };
        match response_result {
            Ok(response) => {
                let mut body_reader = response.into_body();
                match body_reader.read_to_string() {
                    Ok(body) => {
                        let rows = Self::parse_response(&body)?;
                        info!(rows = rows.len(), "Received scraped games");
                        Ok(rows)
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to read scrape response body");
                        Err(ScrapeError::Response(format!("Failed to read response body: {}", e)))
                    }
                }
            }
            Err(ureq::Error::StatusCode(code @ (400 | 401 | 403))) => {
                error!(status = code, "Portal rejected credentials");
                Err(ScrapeError::InvalidCredentials(format!("scrape service answered {}", code)))
            }
            Err(ureq::Error::Timeout(t)) => {
                error!(timeout = ?t, "Scrape request timed out");
                Err(ScrapeError::Timeout(format!("no answer within {}s", self.timeout.as_secs())))
            }
            Err(e) => {
                error!(error = %e, "Scrape request failed");
                Err(ScrapeError::Unreachable(e.to_string()))
            }
        }
    }
}

/// Fixed schedule served for the demo referee numbers.
#[derive(Debug, Clone, Default)]
pub struct DemoScraper;

impl Scraper for DemoScraper {
    fn scrape(&self, credentials: &Credentials) -> Result<Vec<RawGameRow>, ScrapeError> {
        if !credentials.is_demo() {
            return Err(ScrapeError::InvalidCredentials(format!(
                "{} is not a demo referee number",
                credentials.ref_number
            )));
        }
        info!("Demo mode, returning fixed schedule");
        Ok(demo_rows())
    }
}

fn demo_rows() -> Vec<RawGameRow> {
    let row = |league: &str, date: &str, home: &str, guest: &str, address: &str| RawGameRow {
        league: league.to_string(),
        date: date.to_string(),
        time: "19:00".to_string(),
        home_team: home.to_string(),
        guest_team: guest.to_string(),
        address: address.to_string(),
    };
    vec![
        row("1 - ליגת על", "25/10/2025", "בני הרצליה פנלינק", "מכבי ת\"א פלייטיקה", "אולם היובל, רח' רש\"י 24, הרצליה"),
        row("101 נוער על צפון", "27/10/2025", "אליצור עירוני נתניה", "הפועל כפר סבא אביב", "ביה\"ס ישורון, רח' שמואל הנציב פינת ברנר, נתניה"),
        row("52 לאומית נשים", "28/10/2025", "מכבי רעננה", "הפועל כפר סבא", "היכל אביב, רח' הפרחים 1, רעננה"),
    ]
}
