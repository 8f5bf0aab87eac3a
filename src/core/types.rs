use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A retained log line. Only the timestamp is parsed up front; the remaining
/// fields stay as text until the line's date is materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub timestamp: NaiveDateTime,
    pub line: String,
}

impl RawEvent {
    #[must_use]
    pub fn new(timestamp: NaiveDateTime, line: impl Into<String>) -> Self {
        Self {
            timestamp,
            line: line.into(),
        }
    }
}

/// Contiguous range `[start, start + length)` of retained lines for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateIndexEntry {
    pub start: usize,
    pub length: usize,
}

impl DateIndexEntry {
    #[must_use]
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    #[must_use]
    pub fn end(self) -> usize {
        self.start + self.length
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.length == 0
    }

    #[must_use]
    pub fn range(self) -> std::ops::Range<usize> {
        self.start..self.end()
    }
}

/// Stable index of a resident in its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResidentId(pub usize);

/// Stable index of an activity in its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivityId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    pub name: String,
    #[serde(default)]
    pub color: String,
}

impl Resident {
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub is_noise: bool,
    #[serde(default)]
    pub is_ignored: bool,
}

impl Activity {
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            is_noise: false,
            is_ignored: false,
        }
    }
}

/// Fully resolved sensor event for the selected day.
///
/// `residents` and `activities` hold registry ids, not copies of the entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorEvent {
    pub time_tag: NaiveDateTime,
    pub sensor_id: String,
    pub sensor_message: String,
    pub sensor_type: String,
    pub comment: String,
    pub residents: SmallVec<[ResidentId; 2]>,
    pub activities: SmallVec<[ActivityId; 2]>,
    pub source_line_index: usize,
}

/// Reconstructed movement segment between two sensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hop {
    pub src: String,
    pub dst: String,
    pub opacity: f64,
    pub show_name: bool,
}

/// Sensor placement declared in `site.json`. Locations and sizes are
/// fractions of the floor-plan width/height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(rename = "locX", default)]
    pub loc_x: f64,
    #[serde(rename = "locY", default)]
    pub loc_y: f64,
    #[serde(rename = "sizeX", default)]
    pub size_x: f64,
    #[serde(rename = "sizeY", default)]
    pub size_y: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}
