use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

pub type TraceResult<T> = Result<T, TraceError>;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("cannot locate {}", path.display())]
    MissingPath { path: PathBuf },

    #[error("{} should be a directory, but a file with the same name exists", path.display())]
    NotADirectory { path: PathBuf },

    #[error("configuration unreadable: {}: {reason}", path.display())]
    ConfigUnreadable { path: PathBuf, reason: String },

    #[error("invalid configuration in {}: {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },

    #[error("no valid dates found in sensor event log")]
    NoValidDates,

    #[error("date {} is not present in the date index", date.format("%a %b %d %Y"))]
    DateNotIndexed { date: NaiveDate },

    #[error("event index {index} out of range for {len} events")]
    EventIndexOutOfRange { index: usize, len: usize },

    #[error("resident path for `{resident}` has {actual} slots, expected {expected}")]
    PathLengthMismatch {
        resident: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("i/o failure while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("log scan cancelled after {lines} lines")]
    Cancelled { lines: u64 },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl TraceError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
