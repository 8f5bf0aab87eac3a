use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use tracing::info;

use crate::core::{
    ActivityRegistry, EntityCatalog, Hop, IndexedLog, ResidentPath, ResidentRegistry,
    SensorEvent, compose_hops, date_label, materialize_day, scan_log_file,
};
use crate::error::{TraceError, TraceResult};
use crate::extensions::{CancellationToken, Progress, ProgressObserver};

use super::{DatasetConfig, DatasetLayout, SiteConfig};

/// Events and resident paths of the currently selected day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayView {
    pub date: NaiveDate,
    pub events: Vec<SensorEvent>,
    pub path: ResidentPath,
}

/// One opened dataset: configs, indexed log, entity dictionaries and the
/// selected day.
///
/// Selecting a date takes `&mut self`, so at most one materialization runs
/// against the dictionaries at a time.
#[derive(Debug, Clone)]
pub struct DatasetSession {
    layout: Option<DatasetLayout>,
    dataset: DatasetConfig,
    site: SiteConfig,
    log: IndexedLog,
    catalog: EntityCatalog,
    current: DayView,
}

impl DatasetSession {
    /// Opens `<root>` and selects its first indexed date.
    pub fn open(root: impl Into<PathBuf>, observer: &mut dyn ProgressObserver) -> TraceResult<Self> {
        Self::open_with_cancellation(root, None, observer)
    }

    pub fn open_with_cancellation(
        root: impl Into<PathBuf>,
        cancellation: Option<CancellationToken>,
        observer: &mut dyn ProgressObserver,
    ) -> TraceResult<Self> {
        let layout = DatasetLayout::new(root);
        layout.assert_directories()?;

        observer.on_progress(&Progress::indeterminate(
            "Load dataset and site configurations",
        ));
        let site = SiteConfig::load(&layout.site_config_path())?;
        let dataset = DatasetConfig::load(&layout.dataset_config_path())?;

        let log = scan_log_file(&layout.events_path(), cancellation, observer)?;
        let mut session = Self::from_indexed_log(dataset, site, log, observer)?;
        session.layout = Some(layout);
        Ok(session)
    }

    /// Builds a session over an already scanned log. Fails with
    /// `NoValidDates` when the log has no retained lines.
    pub fn from_indexed_log(
        dataset: DatasetConfig,
        site: SiteConfig,
        log: IndexedLog,
        observer: &mut dyn ProgressObserver,
    ) -> TraceResult<Self> {
        log.ensure_dates()?;
        let first = log.index().first_date().ok_or(TraceError::NoValidDates)?;

        let mut catalog = EntityCatalog::new(dataset.residents.clone(), dataset.activities.clone());
        let current = load_day(&log, first, &mut catalog, observer)?;

        info!(
            name = %dataset.name,
            events = log.lines().len(),
            days = log.index().len(),
            first = %date_label(first),
            "dataset session opened"
        );

        Ok(Self {
            layout: None,
            dataset,
            site,
            log,
            catalog,
            current,
        })
    }

    /// Materializes `date`, replacing the current day. On error the previous
    /// day stays selected.
    pub fn select_date(
        &mut self,
        date: NaiveDate,
        observer: &mut dyn ProgressObserver,
    ) -> TraceResult<&DayView> {
        let day = load_day(&self.log, date, &mut self.catalog, observer)?;
        self.current = day;
        Ok(&self.current)
    }

    /// Movement hops ending at event `index` of the current day.
    pub fn hops(&self, index: usize, window: usize) -> TraceResult<IndexMap<String, Vec<Hop>>> {
        compose_hops(&self.current.path, index, window)
    }

    #[must_use]
    pub fn layout(&self) -> Option<&DatasetLayout> {
        self.layout.as_ref()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.dataset.name
    }

    #[must_use]
    pub fn dataset(&self) -> &DatasetConfig {
        &self.dataset
    }

    #[must_use]
    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    #[must_use]
    pub fn log(&self) -> &IndexedLog {
        &self.log
    }

    #[must_use]
    pub fn residents(&self) -> &ResidentRegistry {
        self.catalog.residents()
    }

    #[must_use]
    pub fn activities(&self) -> &ActivityRegistry {
        self.catalog.activities()
    }

    #[must_use]
    pub fn current_day(&self) -> &DayView {
        &self.current
    }

    #[must_use]
    pub fn current_date(&self) -> NaiveDate {
        self.current.date
    }

    /// Timestamp of the first retained line.
    #[must_use]
    pub fn start_timestamp(&self) -> Option<NaiveDateTime> {
        self.log.start_timestamp()
    }

    /// Timestamp of the last retained line.
    #[must_use]
    pub fn end_timestamp(&self) -> Option<NaiveDateTime> {
        self.log.end_timestamp()
    }
}

fn load_day(
    log: &IndexedLog,
    date: NaiveDate,
    catalog: &mut EntityCatalog,
    observer: &mut dyn ProgressObserver,
) -> TraceResult<DayView> {
    let events = materialize_day(log, date, catalog, observer)?;
    let path = ResidentPath::build(&events, catalog.residents());
    Ok(DayView { date, events, path })
}
