//! smarthome-trace: sensor event log indexing and resident trajectories.
//!
//! The crate turns an append-only smart-home event log into a gap-free date
//! index, materializes one day at a time into entity-resolved events, and
//! reconstructs per-resident movement hops for trajectory renderers.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod telemetry;

pub use api::{DatasetConfig, DatasetSession, SiteConfig};
pub use error::{TraceError, TraceResult};
