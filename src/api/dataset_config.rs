use std::collections::HashSet;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::core::{Activity, Resident, Sensor};
use crate::error::{TraceError, TraceResult};

/// Contents of `data/dataset.json`.
///
/// Missing keys take the defaults below; keys this crate does not know are
/// kept in `extra` and written back unchanged.
///
/// | key          | default |
/// |--------------|---------|
/// | `name`       | `""`    |
/// | `activities` | `[]`    |
/// | `residents`  | `[]`    |
/// | `site`       | `""`    |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub name: String,
    pub activities: Vec<Activity>,
    pub residents: Vec<Resident>,
    pub site: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Contents of `site/site.json`, with the same default/extra rules as
/// [`DatasetConfig`]: `name`, `floorplan` and `timezone` default to `""`,
/// `sensors` to `[]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub floorplan: String,
    pub sensors: Vec<Sensor>,
    pub timezone: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DatasetConfig {
    pub fn load(path: &Path) -> TraceResult<Self> {
        let config: Self = read_json(path)?;
        config.validate(path)?;
        debug!(
            path = %path.display(),
            residents = config.residents.len(),
            activities = config.activities.len(),
            "loaded dataset configuration"
        );
        Ok(config)
    }

    pub fn validate(&self, path: &Path) -> TraceResult<()> {
        unique_names(path, "resident", self.residents.iter().map(|r| r.name.as_str()))?;
        unique_names(path, "activity", self.activities.iter().map(|a| a.name.as_str()))
    }
}

impl SiteConfig {
    pub fn load(path: &Path) -> TraceResult<Self> {
        let config: Self = read_json(path)?;
        config.validate(path)?;
        debug!(
            path = %path.display(),
            sensors = config.sensors.len(),
            "loaded site configuration"
        );
        Ok(config)
    }

    pub fn validate(&self, path: &Path) -> TraceResult<()> {
        unique_names(path, "sensor", self.sensors.iter().map(|s| s.name.as_str()))?;
        for sensor in &self.sensors {
            let geometry = [sensor.loc_x, sensor.loc_y, sensor.size_x, sensor.size_y];
            if geometry.iter().any(|value| !value.is_finite()) {
                return Err(TraceError::InvalidConfig {
                    path: path.to_path_buf(),
                    reason: format!("sensor `{}` has non-finite location or size", sensor.name),
                });
            }
        }
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> TraceResult<T> {
    let raw = std::fs::read_to_string(path).map_err(|err| TraceError::ConfigUnreadable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|err| TraceError::ConfigUnreadable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

fn unique_names<'a>(
    path: &Path,
    kind: &str,
    names: impl Iterator<Item = &'a str>,
) -> TraceResult<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(TraceError::InvalidConfig {
                path: path.to_path_buf(),
                reason: format!("{kind} name must not be empty"),
            });
        }
        if !seen.insert(name) {
            return Err(TraceError::InvalidConfig {
                path: path.to_path_buf(),
                reason: format!("duplicate {kind} name `{name}`"),
            });
        }
    }
    Ok(())
}
