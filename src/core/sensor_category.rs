use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::types::Sensor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorCategory {
    Motion,
    Door,
    Item,
    Battery,
    Radio,
    Light,
    LightSwitch,
    Temperature,
    Other,
}

/// Categories drawn by trajectory renderers.
pub const PATH_CATEGORIES: [SensorCategory; 3] = [
    SensorCategory::Motion,
    SensorCategory::Item,
    SensorCategory::Door,
];

/// Guesses categories from the free-form type strings of a sensor.
///
/// Matching is a case-insensitive substring test, so `"LightSwitch"` yields
/// both `Light` and `LightSwitch`. A sensor matching nothing is `Other`.
#[must_use]
pub fn guess_categories(types: &[String]) -> SmallVec<[SensorCategory; 2]> {
    let mut categories: SmallVec<[SensorCategory; 2]> = SmallVec::new();
    let mut add = |category: SensorCategory| {
        if !categories.contains(&category) {
            categories.push(category);
        }
    };

    for sensor_type in types {
        let lower = sensor_type.to_lowercase();
        if lower.contains("motion") {
            add(SensorCategory::Motion);
        }
        if lower.contains("door") {
            add(SensorCategory::Door);
        }
        if lower.contains("item") {
            add(SensorCategory::Item);
        }
        if lower.contains("battery") {
            add(SensorCategory::Battery);
        }
        if lower.contains("radio") || lower.contains("zigbee") {
            add(SensorCategory::Radio);
        }
        if lower.contains("light") {
            add(SensorCategory::Light);
        }
        if lower.contains("lightswitch") {
            add(SensorCategory::LightSwitch);
        }
        if lower.contains("temperature") || lower.contains("thermostat") {
            add(SensorCategory::Temperature);
        }
    }

    if categories.is_empty() {
        categories.push(SensorCategory::Other);
    }
    categories
}

/// Name-keyed sensor lookup, optionally restricted to sensors in any of `categories`.
#[must_use]
pub fn sensor_lookup<'a>(
    sensors: &'a [Sensor],
    categories: Option<&[SensorCategory]>,
) -> IndexMap<&'a str, &'a Sensor> {
    sensors
        .iter()
        .filter(|sensor| {
            categories.is_none_or(|wanted| {
                guess_categories(&sensor.types)
                    .iter()
                    .any(|category| wanted.contains(category))
            })
        })
        .map(|sensor| (sensor.name.as_str(), sensor))
        .collect()
}
