use std::io::Cursor;

use chrono::NaiveDate;
use smarthome_trace::TraceError;
use smarthome_trace::core::{
    Activity, ActivityId, EntityCatalog, IndexedLog, Resident, ResidentId, ScanOptions,
    materialize_day, scan_log,
};
use smarthome_trace::extensions::{NoProgress, Progress};

const SCENARIO: &str = "2011-06-15 09:12:00.000000,M001,ON,Mary;,Sleep;,Motion,\n\
                        2011-06-15 09:12:05.000000,M002,ON,Mary;,Sleep;,Motion,\n";

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn scan(input: &str) -> IndexedLog {
    scan_log(Cursor::new(input), &ScanOptions::new(), &mut NoProgress).expect("scan")
}

#[test]
fn scenario_discovers_one_resident_and_one_activity() {
    let log = scan(SCENARIO);
    let mut catalog = EntityCatalog::default();

    let events =
        materialize_day(&log, day(2011, 6, 15), &mut catalog, &mut NoProgress).expect("events");

    assert_eq!(events.len(), 2);
    assert_eq!(catalog.residents().len(), 1);
    assert_eq!(catalog.activities().len(), 1);
    let mary = catalog.residents().by_name("Mary").expect("Mary");
    assert_eq!(mary.color, "#ff8a80");
    let sleep = catalog.activities().by_name("Sleep").expect("Sleep");
    assert_eq!(sleep.color, "#ff8a80");
    assert!(!sleep.is_noise);
    assert!(!sleep.is_ignored);

    assert_eq!(events[0].sensor_id, "M001");
    assert_eq!(events[1].sensor_id, "M002");
    assert_eq!(events[1].sensor_message, "ON");
    assert_eq!(events[1].sensor_type, "Motion");
    assert_eq!(events[1].comment, "");
    assert_eq!(events[1].source_line_index, 1);
    assert_eq!(events[0].residents.as_slice(), &[ResidentId(0)]);
    assert_eq!(events[0].activities.as_slice(), &[ActivityId(0)]);
}

#[test]
fn declared_entities_keep_their_colors_and_ids() {
    let log = scan(
        "2011-06-15 09:00:00,M001,ON,Bob;Mary,Cook;Eat,Motion,\n",
    );
    let mut catalog = EntityCatalog::new(
        vec![Resident::new("Mary", "#123456")],
        vec![Activity::new("Eat", "#abcdef")],
    );

    let events =
        materialize_day(&log, day(2011, 6, 15), &mut catalog, &mut NoProgress).expect("events");

    assert_eq!(events[0].residents.as_slice(), &[ResidentId(1), ResidentId(0)]);
    assert_eq!(events[0].activities.as_slice(), &[ActivityId(1), ActivityId(0)]);
    assert_eq!(catalog.residents().by_name("Mary").unwrap().color, "#123456");
    assert_eq!(catalog.residents().by_name("Bob").unwrap().color, "#ff8a80");
    assert_eq!(catalog.activities().by_name("Cook").unwrap().color, "#ff8a80");
}

#[test]
fn residents_and_activities_cycle_colors_independently() {
    let log = scan(
        "2011-06-15 09:00:00,M001,ON,A;B;C,X,Motion,\n",
    );
    let mut catalog = EntityCatalog::default();
    materialize_day(&log, day(2011, 6, 15), &mut catalog, &mut NoProgress).expect("events");

    let colors: Vec<_> = catalog
        .residents()
        .iter()
        .map(|(_, resident)| resident.color.clone())
        .collect();
    assert_eq!(colors, vec!["#ff8a80", "#ff80ab", "#ea80fc"]);
    assert_eq!(catalog.activities().by_name("X").unwrap().color, "#ff8a80");
}

#[test]
fn empty_name_tokens_are_never_created() {
    let log = scan("2011-06-15 09:00:00,M001,ON,;;,;,Motion,\n");
    let mut catalog = EntityCatalog::default();
    let events =
        materialize_day(&log, day(2011, 6, 15), &mut catalog, &mut NoProgress).expect("events");
    assert!(events[0].residents.is_empty());
    assert!(events[0].activities.is_empty());
    assert!(catalog.residents().is_empty());
    assert!(catalog.activities().is_empty());
}

#[test]
fn dictionaries_persist_across_days() {
    let log = scan(
        "2011-06-13 09:00:00,M001,ON,Ann,,Motion,\n\
         2011-06-15 09:00:00,M002,ON,Ann;Ben,,Motion,\n",
    );
    let mut catalog = EntityCatalog::default();
    materialize_day(&log, day(2011, 6, 13), &mut catalog, &mut NoProgress).expect("day 1");
    let events =
        materialize_day(&log, day(2011, 6, 15), &mut catalog, &mut NoProgress).expect("day 3");

    assert_eq!(events[0].residents.as_slice(), &[ResidentId(0), ResidentId(1)]);
    assert_eq!(catalog.residents().by_name("Ben").unwrap().color, "#ff80ab");
}

#[test]
fn materializing_twice_is_element_wise_equal() {
    let log = scan(SCENARIO);
    let mut catalog = EntityCatalog::default();
    let first =
        materialize_day(&log, day(2011, 6, 15), &mut catalog, &mut NoProgress).expect("first");
    let second =
        materialize_day(&log, day(2011, 6, 15), &mut catalog, &mut NoProgress).expect("second");
    assert_eq!(first, second);
    assert_eq!(catalog.residents().len(), 1);
}

#[test]
fn empty_gap_day_materializes_to_no_events() {
    let log = scan(
        "2011-06-15 09:00:00,M001,ON,,,,\n\
         2011-06-17 09:00:00,M002,ON,,,,\n",
    );
    let mut catalog = EntityCatalog::default();
    let events =
        materialize_day(&log, day(2011, 6, 16), &mut catalog, &mut NoProgress).expect("events");
    assert!(events.is_empty());
}

#[test]
fn unknown_date_is_an_invalid_selection() {
    let log = scan(SCENARIO);
    let mut catalog = EntityCatalog::default();
    let result = materialize_day(&log, day(2012, 1, 1), &mut catalog, &mut NoProgress);
    assert!(matches!(result, Err(TraceError::DateNotIndexed { .. })));
}

#[test]
fn materialization_reports_event_progress() {
    let mut input = String::new();
    for second in 0..20 {
        input.push_str(&format!("2011-06-15 09:00:{second:02},M001,ON,,,,\n"));
    }
    let log = scan(&input);
    let mut catalog = EntityCatalog::default();
    let mut updates: Vec<Progress> = Vec::new();
    let mut observer = |progress: &Progress| updates.push(progress.clone());

    materialize_day(&log, day(2011, 6, 15), &mut catalog, &mut observer).expect("events");

    assert!(!updates.is_empty());
    assert!(updates.iter().all(|update| update.total == 20));
    assert!(updates[0].message.starts_with("Loading events"));
}
