use chrono::NaiveDate;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::colors::ColorCycler;
use crate::core::date_index::IndexedLog;
use crate::core::registry::{ActivityRegistry, Entity, PendingEntities, Registry, ResidentRegistry};
use crate::core::timestamp::date_label;
use crate::core::types::{Activity, Resident, SensorEvent};
use crate::error::TraceResult;
use crate::extensions::{PercentageGate, Progress, ProgressObserver};

/// Fields per log line: timestamp, sensor id, message, residents, activities, type, comment.
pub const LOG_FIELD_COUNT: usize = 7;

/// Separator inside the resident and activity fields.
pub const NAME_SEPARATOR: char = ';';

/// Session-scoped entity dictionaries with one color cycler per entity kind.
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    residents: ResidentRegistry,
    activities: ActivityRegistry,
    resident_colors: ColorCycler,
    activity_colors: ColorCycler,
}

impl EntityCatalog {
    #[must_use]
    pub fn new(residents: Vec<Resident>, activities: Vec<Activity>) -> Self {
        Self {
            residents: Registry::from_declared(residents),
            activities: Registry::from_declared(activities),
            resident_colors: ColorCycler::new(),
            activity_colors: ColorCycler::new(),
        }
    }

    #[must_use]
    pub fn residents(&self) -> &ResidentRegistry {
        &self.residents
    }

    #[must_use]
    pub fn activities(&self) -> &ActivityRegistry {
        &self.activities
    }
}

/// Raw fields of one log line, borrowed from the line text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFields<'a> {
    pub timestamp: &'a str,
    pub sensor_id: &'a str,
    pub sensor_message: &'a str,
    pub residents: &'a str,
    pub activities: &'a str,
    pub sensor_type: &'a str,
    pub comment: &'a str,
}

/// Splits a line on every comma. There is no quoting: a comma inside a field
/// shifts the remaining fields, and the surplus tokens are dropped with a
/// warning. Missing trailing fields read as empty.
#[must_use]
pub fn split_fields(line: &str, line_index: usize) -> LineFields<'_> {
    let mut tokens = [""; LOG_FIELD_COUNT];
    let mut count = 0usize;
    for token in line.split(',') {
        if count < LOG_FIELD_COUNT {
            tokens[count] = token;
        }
        count += 1;
    }
    if count != LOG_FIELD_COUNT {
        warn!(
            line_index,
            fields = count,
            expected = LOG_FIELD_COUNT,
            "unexpected field count in sensor event line"
        );
    }

    LineFields {
        timestamp: tokens[0],
        sensor_id: tokens[1],
        sensor_message: tokens[2],
        residents: tokens[3],
        activities: tokens[4],
        sensor_type: tokens[5],
        comment: tokens[6],
    }
}

fn resolve_names<T: Entity>(
    field: &str,
    registry: &Registry<T>,
    batch: &mut PendingEntities<T>,
    cycler: &mut ColorCycler,
) -> SmallVec<[T::Id; 2]> {
    let mut ids: SmallVec<[T::Id; 2]> = SmallVec::new();
    for name in field.split(NAME_SEPARATOR) {
        if let Some(id) = batch.resolve_or_stage(registry, name, cycler) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// Converts the retained lines of `date` into resolved sensor events.
///
/// Names are resolved against the catalog without mutating it; entities seen
/// for the first time are staged and appended to the catalog only after the
/// whole day has been processed. Event order follows source line order.
pub fn materialize_day(
    log: &IndexedLog,
    date: NaiveDate,
    catalog: &mut EntityCatalog,
    observer: &mut dyn ProgressObserver,
) -> TraceResult<Vec<SensorEvent>> {
    let entry = log.index().require(date)?;
    let lines = log.lines_for(date)?;
    debug!(
        date = %date_label(date),
        start = entry.start,
        length = entry.length,
        "materializing events"
    );

    let mut resident_batch = catalog.residents.begin_batch();
    let mut activity_batch = catalog.activities.begin_batch();
    let mut gate = PercentageGate::default();
    let total = lines.len() as u64;
    let mut events = Vec::with_capacity(lines.len());

    for (offset, raw) in lines.iter().enumerate() {
        let line_index = entry.start + offset;
        let fields = split_fields(&raw.line, line_index);

        let residents = resolve_names(
            fields.residents,
            &catalog.residents,
            &mut resident_batch,
            &mut catalog.resident_colors,
        );
        let activities = resolve_names(
            fields.activities,
            &catalog.activities,
            &mut activity_batch,
            &mut catalog.activity_colors,
        );

        events.push(SensorEvent {
            time_tag: raw.timestamp,
            sensor_id: fields.sensor_id.to_owned(),
            sensor_message: fields.sensor_message.to_owned(),
            sensor_type: fields.sensor_type.to_owned(),
            comment: fields.comment.to_owned(),
            residents,
            activities,
            source_line_index: line_index,
        });

        if gate.should_report(offset as u64, total) {
            observer.on_progress(&Progress::determinate(
                format!("Loading events {offset} / {total}"),
                offset as u64,
                total,
            ));
        }
    }

    let new_residents = catalog.residents.commit(resident_batch)?;
    let new_activities = catalog.activities.commit(activity_batch)?;
    debug!(
        date = %date_label(date),
        events = events.len(),
        new_residents,
        new_activities,
        "materialized events"
    );
    Ok(events)
}
