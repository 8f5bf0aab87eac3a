//! Dataset-facing surface: directory layout, configuration, sessions and import.

mod dataset_config;
mod import;
mod layout;
mod session;

pub use dataset_config::{DatasetConfig, SiteConfig};
pub use import::{FileCopy, IGNORED_FILE_NAMES, ImportPlan, ImportSummary, import_dataset, plan_import};
pub use layout::{
    DATA_DIR, DATASET_CONFIG_FILE, DatasetLayout, EVENTS_FILE, SITE_CONFIG_FILE, SITE_DIR,
    assert_directory, directory_exists,
};
pub use session::{DatasetSession, DayView};
