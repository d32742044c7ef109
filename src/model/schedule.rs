use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;

/// Parse the portal's `day/month/year` date. A 2-digit year means 20xx.
pub fn parse_game_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim().split('/');
    let day = parts.next()?.trim().parse::<u32>().ok()?;
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    let year_s = parts.next()?.trim();
    if parts.next().is_some() {
        return None;
    }
    let year = match year_s.len() {
        2 => format!("20{}", year_s).parse::<i32>().ok()?,
        4 => year_s.parse::<i32>().ok()?,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a 24h `HH:MM` clock time.
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let (h, m) = raw.trim().split_once(':')?;
    let hour = h.trim().parse::<u32>().ok()?;
    let minute = m.trim().parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// `HH:MM` plus whole hours, wrapping the hour at 24.
pub fn add_hours_wrapping(time: &str, hours: u32) -> Option<String> {
    let clock = parse_clock(time)?;
    let hour = (clock.hour() + hours) % 24;
    Some(format!("{:02}:{:02}", hour, clock.minute()))
}

/// Start of the game in the given zone. Ambiguous local times resolve to the earlier instant;
/// times skipped by a DST jump have no start.
pub fn kickoff(date: &str, time: &str, tz: Tz) -> Option<DateTime<Tz>> {
    let naive = parse_game_date(date)?.and_time(parse_clock(time)?);
    tz.from_local_datetime(&naive).earliest()
}

/// Start and end of the calendar slot for a game lasting `duration_hours`.
/// The end rolls into the next day when the clock wraps past midnight.
pub fn game_window(date: &str, time: &str, tz: Tz, duration_hours: u32) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
    let start = kickoff(date, time, tz)?;
    Some((start, start + Duration::hours(i64::from(duration_hours))))
}
