use std::path::{Path, PathBuf};

use crate::error::{TraceError, TraceResult};

use super::SiteConfig;

pub const DATA_DIR: &str = "data";
pub const SITE_DIR: &str = "site";
pub const EVENTS_FILE: &str = "events.csv";
pub const DATASET_CONFIG_FILE: &str = "dataset.json";
pub const SITE_CONFIG_FILE: &str = "site.json";

/// On-disk layout of an imported dataset:
///
/// ```text
/// <root>/data/events.csv
/// <root>/data/dataset.json
/// <root>/site/site.json
/// <root>/site/<floorplan>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    #[must_use]
    pub fn site_dir(&self) -> PathBuf {
        self.root.join(SITE_DIR)
    }

    #[must_use]
    pub fn events_path(&self) -> PathBuf {
        self.data_dir().join(EVENTS_FILE)
    }

    #[must_use]
    pub fn dataset_config_path(&self) -> PathBuf {
        self.data_dir().join(DATASET_CONFIG_FILE)
    }

    #[must_use]
    pub fn site_config_path(&self) -> PathBuf {
        self.site_dir().join(SITE_CONFIG_FILE)
    }

    /// Floor-plan image path, `None` when the site config names none.
    #[must_use]
    pub fn floorplan_path(&self, site: &SiteConfig) -> Option<PathBuf> {
        if site.floorplan.is_empty() {
            return None;
        }
        Some(self.site_dir().join(&site.floorplan))
    }

    /// Checks the root, `data/` and `site/` directories.
    pub fn assert_directories(&self) -> TraceResult<()> {
        assert_directory(&self.root)?;
        assert_directory(&self.data_dir())?;
        assert_directory(&self.site_dir())
    }
}

/// Returns `Ok(false)` when `path` does not exist and `NotADirectory` when a
/// file sits where a directory is expected.
pub fn directory_exists(path: &Path) -> TraceResult<bool> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(true),
        Ok(_) => Err(TraceError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(TraceError::io(
            format!("reading metadata of {}", path.display()),
            err,
        )),
    }
}

/// Like [`directory_exists`] but a missing directory is a `MissingPath` error.
pub fn assert_directory(path: &Path) -> TraceResult<()> {
    if directory_exists(path)? {
        Ok(())
    } else {
        Err(TraceError::MissingPath {
            path: path.to_path_buf(),
        })
    }
}
