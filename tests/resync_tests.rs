use chrono::{TimeZone, Utc};

use referee_calendar_sync::calendar::managed::{SYNC_MARKER, is_managed, looks_like_game_summary};
use referee_calendar_sync::config::Settings;
use referee_calendar_sync::model::event::CalendarEvent;
use referee_calendar_sync::model::snapshot::Snapshot;
use referee_calendar_sync::resync::{ResyncEngine, SyncWindow};

mod common;
use common::FakeCalendar;

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
}

fn snapshot() -> Snapshot {
    Snapshot::from_rows(&[common::game_one(), common::game_three()])
}

#[test]
fn window_spans_snapshot_dates_plus_trailing_buffer() {
    let window = SyncWindow::for_snapshot(&snapshot(), &Settings::default(), now());
    // 25/10/2026 00:00 in Jerusalem (UTC+3) through 10/11/2026 00:00 (UTC+2)
    assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 10, 24, 21, 0, 0).unwrap());
    assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 11, 9, 22, 0, 0).unwrap());
}

#[test]
fn window_for_empty_snapshot_is_today_plus_a_year() {
    let window = SyncWindow::for_snapshot(&Snapshot::default(), &Settings::default(), now());
    assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 10, 17, 21, 0, 0).unwrap());
    // 18/10/2027 + 1 day + 7 days buffer, still summer time (UTC+3)
    assert_eq!(window.end, Utc.with_ymd_and_hms(2027, 10, 25, 21, 0, 0).unwrap());
}

#[test]
fn window_with_huge_day_counts_clamps_instead_of_overflowing() {
    let settings = Settings { default_window_days: u32::MAX, trailing_buffer_days: u32::MAX, ..Settings::default() };
    let empty = SyncWindow::for_snapshot(&Snapshot::default(), &settings, now());
    assert_eq!(empty.start, Utc.with_ymd_and_hms(2026, 10, 17, 21, 0, 0).unwrap());
    assert!(empty.end > empty.start);

    let dated = SyncWindow::for_snapshot(&snapshot(), &settings, now());
    assert_eq!(dated.start, Utc.with_ymd_and_hms(2026, 10, 24, 21, 0, 0).unwrap());
    assert!(dated.end > dated.start);
}

#[test]
fn game_summary_shape_is_recognised() {
    assert!(looks_like_game_summary("הרצליה פנלינק - תל אביב [ליגת על]"));
    assert!(looks_like_game_summary("A - B [League]"));
    assert!(!looks_like_game_summary("A - B"));
    assert!(!looks_like_game_summary("Meeting [work]"));
    assert!(!looks_like_game_summary("A - B []"));
    assert!(!looks_like_game_summary(" - B [x]"));
}

#[test]
fn venue_keyword_needs_a_dash_in_the_summary() {
    let mut event = CalendarEvent {
        id: "x".to_string(),
        summary: "ארוחת ערב".to_string(),
        location: "אולם האירועים, חיפה".to_string(),
        ..CalendarEvent::default()
    };
    assert!(!is_managed(&event));
    event.summary = "מכבי - הפועל".to_string();
    assert!(is_managed(&event));
}

#[test]
fn marker_in_description_makes_event_managed() {
    let event = CalendarEvent {
        id: "x".to_string(),
        summary: "renamed by hand".to_string(),
        description: format!("notes\n{}", SYNC_MARKER),
        ..CalendarEvent::default()
    };
    assert!(is_managed(&event));
}

#[test]
fn resync_removes_duplicates_and_recreates_snapshot() {
    let calendar = FakeCalendar::new();
    let kickoff = Utc.with_ymd_and_hms(2026, 10, 25, 17, 0, 0).unwrap();
    for id in ["dup1", "dup2", "dup3"] {
        calendar.insert(id, "הרצליה פנלינק - תל אביב [ליגת על]", "אולם היובל", kickoff);
    }
    calendar.insert("personal", "Dentist", "Clinic", kickoff);

    let settings = Settings::default();
    let engine = ResyncEngine::new(&calendar, &settings);
    let snap = snapshot();

    let first = engine.resync(&snap, now()).expect("first run");
    assert_eq!(first.deleted, 3);
    assert_eq!(first.created, 2);
    assert_eq!(first.failed, 0);
    assert_eq!(first.event_ids.len(), 2);
    assert!(first.event_ids.iter().all(Option::is_some));

    let second = engine.resync(&snap, now()).expect("second run");
    assert_eq!(second.deleted, 2);
    assert_eq!(second.created, 2);

    let managed: Vec<_> = calendar.events.borrow().values().filter(|e| is_managed(e)).cloned().collect();
    assert_eq!(managed.len(), snap.len());
    assert!(calendar.contains("personal"));
    assert_eq!(calendar.len(), 3);
    for id in second.event_ids.iter().flatten() {
        assert!(calendar.contains(id));
    }
}

#[test]
fn events_outside_the_window_are_left_alone() {
    let calendar = FakeCalendar::new();
    let far = Utc.with_ymd_and_hms(2027, 6, 1, 17, 0, 0).unwrap();
    calendar.insert("old_game", "A - B [League]", "אולם", far);

    let settings = Settings::default();
    let outcome = ResyncEngine::new(&calendar, &settings).resync(&snapshot(), now()).expect("resync");
    assert_eq!(outcome.deleted, 0);
    assert!(calendar.contains("old_game"));
}

#[test]
fn failed_create_is_counted_and_skipped() {
    let calendar = FakeCalendar::new();
    *calendar.fail_create_containing.borrow_mut() = Some("מכבי רעננה".to_string());

    let settings = Settings::default();
    let outcome = ResyncEngine::new(&calendar, &settings).resync(&snapshot(), now()).expect("resync");
    assert_eq!(outcome.created, 1);
    assert_eq!(outcome.failed, 1);
    assert!(outcome.event_ids[0].is_some());
    assert!(outcome.event_ids[1].is_none());
}

#[test]
fn failed_delete_is_counted_and_the_run_continues() {
    let calendar = FakeCalendar::new();
    let kickoff = Utc.with_ymd_and_hms(2026, 10, 25, 17, 0, 0).unwrap();
    for id in ["stale1", "stale2", "stale3"] {
        calendar.insert(id, "הרצליה פנלינק - תל אביב [ליגת על]", "אולם היובל", kickoff);
    }
    *calendar.fail_delete_id.borrow_mut() = Some("stale2".to_string());

    let settings = Settings::default();
    let snap = snapshot();
    let outcome = ResyncEngine::new(&calendar, &settings).resync(&snap, now()).expect("resync");

    assert_eq!(outcome.deleted, 2);
    assert_eq!(outcome.failed, 1);
    assert!(!calendar.contains("stale1"));
    assert!(calendar.contains("stale2"));
    assert!(!calendar.contains("stale3"));

    assert_eq!(outcome.created, snap.len());
    assert_eq!(outcome.event_ids.len(), snap.len());
    for id in outcome.event_ids.iter().flatten() {
        assert!(calendar.contains(id));
    }
    assert_eq!(calendar.len(), snap.len() + 1);
}

#[test]
fn undatable_game_is_not_placed() {
    let mut bad = common::game_two();
    bad.date = "soon".to_string();
    let snap = Snapshot::from_rows(&[common::game_one(), bad]);

    let calendar = FakeCalendar::new();
    let settings = Settings::default();
    let outcome = ResyncEngine::new(&calendar, &settings).resync(&snap, now()).expect("resync");
    assert_eq!(outcome.created, 1);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.event_ids.len(), 2);
}

#[test]
fn list_failure_aborts_before_touching_anything() {
    let calendar = FakeCalendar::new();
    calendar.insert("dup", "A - B [League]", "", Utc.with_ymd_and_hms(2026, 10, 25, 17, 0, 0).unwrap());
    calendar.fail_list.set(true);

    let settings = Settings::default();
    let result = ResyncEngine::new(&calendar, &settings).resync(&snapshot(), now());
    assert!(result.is_err());
    assert_eq!(calendar.deletes.get(), 0);
    assert_eq!(calendar.creates.get(), 0);
}

#[test]
fn created_events_use_summary_location_and_two_hour_slot() {
    let calendar = FakeCalendar::new();
    let settings = Settings::default();
    let snap = Snapshot::from_rows(&[common::game_one()]);
    let outcome = ResyncEngine::new(&calendar, &settings).resync(&snap, now()).expect("resync");

    let id = outcome.event_ids[0].clone().expect("id");
    let events = calendar.events.borrow();
    let event = events.get(&id).expect("event");
    assert_eq!(event.summary, "הרצליה פנלינק - תל אביב [ליגת על]");
    assert_eq!(event.location, "אולם היובל, הרצליה");
    assert_eq!(event.description, SYNC_MARKER);
    assert_eq!(event.start, Some(Utc.with_ymd_and_hms(2026, 10, 25, 17, 0, 0).unwrap()));
}
