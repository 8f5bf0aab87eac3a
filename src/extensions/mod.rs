//! Host-facing hooks: progress reporting and cooperative cancellation.
//!
//! Nothing here depends on `core`; the scanner and session accept these as
//! plain trait objects and handles.

pub mod cancellation;
pub mod progress;

pub use cancellation::CancellationToken;
pub use progress::{NoProgress, Progress, ProgressObserver};
pub(crate) use progress::PercentageGate;
