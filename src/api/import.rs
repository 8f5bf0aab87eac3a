use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{TraceError, TraceResult};
use crate::extensions::{Progress, ProgressObserver};

use super::layout::{DATA_DIR, DATASET_CONFIG_FILE, SITE_CONFIG_FILE, SITE_DIR, assert_directory};
use super::{DatasetConfig, SiteConfig};

/// File names never copied into an imported dataset.
pub const IGNORED_FILE_NAMES: [&str; 1] = [".DS_Store"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCopy {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Directories to create (parents first) and files to copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPlan {
    pub dirs: Vec<PathBuf>,
    pub files: Vec<FileCopy>,
}

impl ImportPlan {
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.dirs.len() + self.files.len()
    }
}

/// Gathers everything under `dataset_dir` into `<output>/data` and
/// everything under `site_dir` into `<output>/site`.
pub fn plan_import(dataset_dir: &Path, site_dir: &Path, output_dir: &Path) -> TraceResult<ImportPlan> {
    let mut dirs = BTreeSet::new();
    let mut files = Vec::new();
    for (source, target) in [
        (dataset_dir, output_dir.join(DATA_DIR)),
        (site_dir, output_dir.join(SITE_DIR)),
    ] {
        dirs.insert(target.clone());
        collect_tree(source, &target, &mut dirs, &mut files)?;
    }
    Ok(ImportPlan {
        dirs: dirs.into_iter().collect(),
        files,
    })
}

fn collect_tree(
    source: &Path,
    target: &Path,
    dirs: &mut BTreeSet<PathBuf>,
    files: &mut Vec<FileCopy>,
) -> TraceResult<()> {
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(source).to_path_buf();
            match err.into_io_error() {
                Some(io) => TraceError::io(format!("walking {}", path.display()), io),
                None => TraceError::InvalidData(format!("filesystem loop at {}", path.display())),
            }
        })?;
        if entry.depth() == 0 {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if IGNORED_FILE_NAMES.contains(&name.as_ref()) {
            continue;
        }
        let relative = entry.path().strip_prefix(source).map_err(|_| {
            TraceError::InvalidData(format!(
                "{} is outside {}",
                entry.path().display(),
                source.display()
            ))
        })?;
        let destination = target.join(relative);
        if entry.file_type().is_dir() {
            dirs.insert(destination);
        } else {
            files.push(FileCopy {
                from: entry.path().to_path_buf(),
                to: destination,
            });
        }
    }
    Ok(())
}

/// Summary of a finished import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub dirs_created: usize,
    pub files_copied: usize,
}

/// Imports a dataset directory and a site directory into `output_dir`,
/// which must already exist. Both configs are validated before anything is
/// written. There is no rollback: a failure mid-copy leaves the partial tree.
pub fn import_dataset(
    dataset_dir: &Path,
    site_dir: &Path,
    output_dir: &Path,
    observer: &mut dyn ProgressObserver,
) -> TraceResult<ImportSummary> {
    assert_directory(output_dir)?;

    observer.on_progress(&Progress::indeterminate(
        "Loading configuration for the dataset and smart home site.",
    ));
    SiteConfig::load(&site_dir.join(SITE_CONFIG_FILE))?;
    DatasetConfig::load(&dataset_dir.join(DATASET_CONFIG_FILE))?;

    observer.on_progress(&Progress::indeterminate("Gathering files to copy"));
    let plan = plan_import(dataset_dir, site_dir, output_dir)?;
    let total = plan.step_count() as u64;
    let mut done = 0u64;

    for dir in &plan.dirs {
        observer.on_progress(&Progress::determinate(
            format!("Create directory {}", dir.display()),
            done,
            total,
        ));
        std::fs::create_dir_all(dir)
            .map_err(|err| TraceError::io(format!("creating {}", dir.display()), err))?;
        debug!(dir = %dir.display(), "created directory");
        done += 1;
    }

    for copy in &plan.files {
        observer.on_progress(&Progress::determinate(
            format!(
                "Copy file from {} to {}",
                copy.from.display(),
                copy.to.display()
            ),
            done,
            total,
        ));
        std::fs::copy(&copy.from, &copy.to).map_err(|err| {
            TraceError::io(
                format!("copying {} to {}", copy.from.display(), copy.to.display()),
                err,
            )
        })?;
        done += 1;
    }

    info!(
        output = %output_dir.display(),
        dirs = plan.dirs.len(),
        files = plan.files.len(),
        "dataset imported"
    );
    Ok(ImportSummary {
        dirs_created: plan.dirs.len(),
        files_copied: plan.files.len(),
    })
}
