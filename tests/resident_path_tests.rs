use std::io::Cursor;

use approx::assert_relative_eq;
use chrono::NaiveDate;
use indexmap::IndexMap;
use smarthome_trace::TraceError;
use smarthome_trace::core::{
    EntityCatalog, ResidentPath, ScanOptions, compose_hops, materialize_day, scan_log,
};
use smarthome_trace::extensions::NoProgress;

fn build_path(input: &str) -> ResidentPath {
    let log = scan_log(Cursor::new(input), &ScanOptions::new(), &mut NoProgress).expect("scan");
    let date = log.index().first_date().expect("date");
    let mut catalog = EntityCatalog::default();
    let events = materialize_day(&log, date, &mut catalog, &mut NoProgress).expect("events");
    ResidentPath::build(&events, catalog.residents())
}

fn slots(values: &[&str]) -> Vec<Option<String>> {
    values
        .iter()
        .map(|value| (!value.is_empty()).then(|| (*value).to_owned()))
        .collect()
}

fn path_of(entries: &[(&str, &[&str])]) -> ResidentPath {
    let mut map = IndexMap::new();
    for (name, values) in entries {
        map.insert((*name).to_owned(), slots(values));
    }
    ResidentPath::from_slots(map)
}

#[test]
fn scenario_path_and_single_hop() {
    let path = build_path(
        "2011-06-15 09:12:00.000000,M001,ON,Mary;,Sleep;,Motion,\n\
         2011-06-15 09:12:05.000000,M002,ON,Mary;,Sleep;,Motion,\n",
    );
    assert_eq!(path.get("Mary").expect("Mary"), slots(&["M001", "M002"]).as_slice());

    let hops = compose_hops(&path, 1, 10).expect("hops");
    let mary = &hops["Mary"];
    assert_eq!(mary.len(), 1);
    assert_eq!(mary[0].src, "M001");
    assert_eq!(mary[0].dst, "M002");
    assert!(mary[0].show_name);
    assert_relative_eq!(mary[0].opacity, 1.0);
}

#[test]
fn non_trigger_messages_and_absent_residents_get_empty_slots() {
    let path = build_path(
        "2011-06-15 09:00:00,M001,ON,Ann,,Motion,\n\
         2011-06-15 09:00:01,M001,OFF,Ann,,Motion,\n\
         2011-06-15 09:00:02,D001,OPEN,Ben,,Door,\n\
         2011-06-15 09:00:03,T001,21.5,Ann;Ben,,Temperature,\n\
         2011-06-15 09:00:04,I001,ABSENT,Ann,,Item,\n",
    );

    assert_eq!(path.event_count(), 5);
    assert_eq!(path.get("Ann").unwrap(), slots(&["M001", "", "", "", "I001"]).as_slice());
    assert_eq!(path.get("Ben").unwrap(), slots(&["", "", "D001", "", ""]).as_slice());
    path.validate().expect("aligned");
}

#[test]
fn hops_are_emitted_nearest_first_with_decaying_opacity() {
    let path = path_of(&[("Ann", &["A", "", "B", "", "C"])]);
    let hops = compose_hops(&path, 4, 10).expect("hops");
    let ann = &hops["Ann"];

    assert_eq!(ann.len(), 2);
    assert_eq!((ann[0].src.as_str(), ann[0].dst.as_str()), ("B", "C"));
    assert_eq!((ann[1].src.as_str(), ann[1].dst.as_str()), ("A", "B"));
    assert!(ann[0].show_name);
    assert!(!ann[1].show_name);
    assert_relative_eq!(ann[0].opacity, 1.0);
    assert_relative_eq!(ann[1].opacity, 0.8);
}

#[test]
fn window_limits_the_backward_scan() {
    let path = path_of(&[("Ann", &["A", "B", "C", "D"])]);
    let hops = compose_hops(&path, 3, 1).expect("hops");
    assert_eq!(hops["Ann"].len(), 1);
    assert_eq!(hops["Ann"][0].src, "C");
    assert_eq!(hops["Ann"][0].dst, "D");
}

#[test]
fn repeated_sensor_readings_produce_a_hop_per_slot_pair() {
    let path = path_of(&[("Ann", &["A", "B", "B"])]);
    let hops = compose_hops(&path, 2, 10).expect("hops");
    let ann = &hops["Ann"];
    assert_eq!(ann.len(), 2);
    assert_eq!((ann[0].src.as_str(), ann[0].dst.as_str()), ("B", "B"));
    assert!(ann[0].show_name);
    assert_relative_eq!(ann[0].opacity, 1.0);
    assert_eq!((ann[1].src.as_str(), ann[1].dst.as_str()), ("A", "B"));
    assert!(!ann[1].show_name);
    assert_relative_eq!(ann[1].opacity, 0.9);
}

#[test]
fn residents_without_movement_have_no_hops() {
    let path = path_of(&[("Ann", &["", "A", ""]), ("Ben", &["", "", ""])]);
    let hops = compose_hops(&path, 2, 5).expect("hops");
    assert!(hops["Ann"].is_empty());
    assert!(hops["Ben"].is_empty());
}

#[test]
fn unequal_path_lengths_are_reported() {
    let path = path_of(&[("Ann", &["A", "B"]), ("Ben", &["A"])]);
    let result = compose_hops(&path, 0, 5);
    assert!(matches!(
        result,
        Err(TraceError::PathLengthMismatch { ref resident, expected: 2, actual: 1 }) if resident == "Ben"
    ));
}

#[test]
fn out_of_range_selection_is_reported() {
    let path = path_of(&[("Ann", &["A", "B"])]);
    assert!(matches!(
        compose_hops(&path, 2, 5),
        Err(TraceError::EventIndexOutOfRange { index: 2, len: 2 })
    ));
}

#[test]
fn zero_window_is_rejected() {
    let path = path_of(&[("Ann", &["A", "B"])]);
    assert!(matches!(
        compose_hops(&path, 1, 0),
        Err(TraceError::InvalidSelection(_))
    ));
}
