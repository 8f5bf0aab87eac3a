pub mod colors;
pub mod date_index;
pub mod log_lines;
pub mod materializer;
pub mod registry;
pub mod resident_path;
pub mod sensor_category;
pub mod timestamp;
pub mod types;

pub use colors::{ColorCycler, ColorFamily, MATERIAL_PALETTE, Shade};
pub use date_index::{
    DateIndex, DateIndexBuilder, IndexedLog, LineOutcome, ScanOptions, ScanStats, scan_log,
    scan_log_file,
};
pub use log_lines::{DEFAULT_MAX_LINE_BYTES, LogLine, LogLines};
pub use materializer::{EntityCatalog, LineFields, materialize_day, split_fields};
pub use registry::{ActivityRegistry, Entity, PendingEntities, Registry, ResidentRegistry};
pub use resident_path::{ResidentPath, TRIGGER_MESSAGES, compose_hops, is_trigger_message};
pub use sensor_category::{PATH_CATEGORIES, SensorCategory, guess_categories, sensor_lookup};
pub use timestamp::{date_label, parse_date_label, parse_line_timestamp, parse_timestamp};
pub use types::{
    Activity, ActivityId, DateIndexEntry, Hop, RawEvent, Resident, ResidentId, Sensor,
    SensorEvent,
};
