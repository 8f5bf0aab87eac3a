use std::fs;

use smarthome_trace::TraceError;
use smarthome_trace::api::{DatasetConfig, SiteConfig};

#[test]
fn missing_keys_fall_back_to_defaults_and_unknown_keys_are_preserved() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dataset.json");
    fs::write(&path, r##"{"name": "tm004", "owner": "casas", "residents": [{"name": "R1", "color": "#f44336"}]}"##)
        .expect("write");

    let config = DatasetConfig::load(&path).expect("load");
    assert_eq!(config.name, "tm004");
    assert_eq!(config.site, "");
    assert!(config.activities.is_empty());
    assert_eq!(config.residents.len(), 1);
    assert_eq!(config.extra["owner"], "casas");

    let round_trip = serde_json::to_value(&config).expect("serialize");
    assert_eq!(round_trip["owner"], "casas");
    assert_eq!(round_trip["site"], "");
}

#[test]
fn activity_flags_use_on_disk_names() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dataset.json");
    fs::write(
        &path,
        r##"{"activities": [{"name": "Sleep", "color": "#2196f3", "is_noise": false, "is_ignored": true}]}"##,
    )
    .expect("write");

    let config = DatasetConfig::load(&path).expect("load");
    assert!(config.activities[0].is_ignored);
    assert!(!config.activities[0].is_noise);
}

#[test]
fn site_sensors_parse_camel_case_geometry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("site.json");
    fs::write(
        &path,
        r#"{
            "name": "kyoto",
            "floorplan": "kyoto.png",
            "timezone": "America/Los_Angeles",
            "sensors": [
                {"name": "M001", "types": ["Control4-Motion"], "locX": 0.25, "locY": 0.5,
                 "sizeX": 0.02, "sizeY": 0.02, "description": null, "serial": null, "tag": "bed"}
            ]
        }"#,
    )
    .expect("write");

    let site = SiteConfig::load(&path).expect("load");
    assert_eq!(site.sensors.len(), 1);
    assert_eq!(site.sensors[0].loc_x, 0.25);
    assert_eq!(site.sensors[0].tag.as_deref(), Some("bed"));
    assert_eq!(site.sensors[0].description, None);
    assert_eq!(site.timezone, "America/Los_Angeles");
}

#[test]
fn missing_file_is_unreadable_with_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dataset.json");
    let err = DatasetConfig::load(&path).expect_err("missing");
    assert!(matches!(err, TraceError::ConfigUnreadable { .. }));
    assert!(err.to_string().contains("dataset.json"));
}

#[test]
fn malformed_json_is_unreadable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("site.json");
    fs::write(&path, "{ not json").expect("write");
    let err = SiteConfig::load(&path).expect_err("malformed");
    assert!(matches!(err, TraceError::ConfigUnreadable { .. }));
    assert!(err.to_string().contains("site.json"));
}

#[test]
fn duplicate_resident_names_are_rejected_at_load_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dataset.json");
    fs::write(&path, r#"{"residents": [{"name": "R1"}, {"name": "R1"}]}"#).expect("write");
    let err = DatasetConfig::load(&path).expect_err("duplicate");
    assert!(matches!(err, TraceError::InvalidConfig { .. }));
}

#[test]
fn empty_sensor_name_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("site.json");
    fs::write(&path, r#"{"sensors": [{"name": ""}]}"#).expect("write");
    assert!(matches!(
        SiteConfig::load(&path),
        Err(TraceError::InvalidConfig { .. })
    ));
}
