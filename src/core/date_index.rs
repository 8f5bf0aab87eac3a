use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::core::log_lines::{DEFAULT_MAX_LINE_BYTES, LogLines};
use crate::core::timestamp::{date_label, next_day, parse_line_timestamp};
use crate::core::types::{DateIndexEntry, RawEvent};
use crate::error::{TraceError, TraceResult};
use crate::extensions::{CancellationToken, PercentageGate, Progress, ProgressObserver};

/// Options for a single log scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub total_bytes: Option<u64>,
    pub cancellation: Option<CancellationToken>,
    pub source_label: String,
    pub max_line_bytes: Option<usize>,
}

impl ScanOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total stream size; enables determinate byte-based progress.
    #[must_use]
    pub fn with_total_bytes(mut self, total_bytes: u64) -> Self {
        self.total_bytes = Some(total_bytes);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Name used in progress messages, usually the log path.
    #[must_use]
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = label.into();
        self
    }

    /// Longer lines are skipped as malformed. Defaults to
    /// [`DEFAULT_MAX_LINE_BYTES`].
    #[must_use]
    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = Some(max_line_bytes);
        self
    }

    fn progress_message(&self, events: u64) -> String {
        if self.source_label.is_empty() {
            format!("{events} sensor events loaded")
        } else {
            format!("{events} sensor events loaded from {}", self.source_label)
        }
    }
}

/// Counters collected while scanning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub lines_read: u64,
    pub lines_retained: u64,
    pub lines_malformed: u64,
    pub lines_out_of_order: u64,
    pub bytes_processed: u64,
}

/// Chronological, gap-free mapping from calendar date to retained-line range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateIndex {
    entries: IndexMap<NaiveDate, DateIndexEntry>,
}

impl DateIndex {
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<DateIndexEntry> {
        self.entries.get(&date).copied()
    }

    /// Looks up a date, failing with `DateNotIndexed` when it is outside the index.
    pub fn require(&self, date: NaiveDate) -> TraceResult<DateIndexEntry> {
        self.get(date).ok_or(TraceError::DateNotIndexed { date })
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.entries.contains_key(&date)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.entries.first().map(|(date, _)| *date)
    }

    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.entries.last().map(|(date, _)| *date)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, DateIndexEntry)> + '_ {
        self.entries.iter().map(|(date, entry)| (*date, *entry))
    }

    /// Entries keyed by their display label (`Thu Jun 15 2011`).
    #[must_use]
    pub fn labeled(&self) -> IndexMap<String, DateIndexEntry> {
        self.iter()
            .map(|(date, entry)| (date_label(date), entry))
            .collect()
    }
}

/// Retained lines plus their date index. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexedLog {
    lines: Vec<RawEvent>,
    index: DateIndex,
    stats: ScanStats,
}

impl IndexedLog {
    #[must_use]
    pub fn lines(&self) -> &[RawEvent] {
        &self.lines
    }

    #[must_use]
    pub fn index(&self) -> &DateIndex {
        &self.index
    }

    #[must_use]
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Fails with `NoValidDates` when no line survived the scan.
    pub fn ensure_dates(&self) -> TraceResult<()> {
        if self.index.is_empty() {
            return Err(TraceError::NoValidDates);
        }
        Ok(())
    }

    #[must_use]
    pub fn start_timestamp(&self) -> Option<NaiveDateTime> {
        self.lines.first().map(|line| line.timestamp)
    }

    #[must_use]
    pub fn end_timestamp(&self) -> Option<NaiveDateTime> {
        self.lines.last().map(|line| line.timestamp)
    }

    /// Retained lines belonging to `date`, in source order.
    pub fn lines_for(&self, date: NaiveDate) -> TraceResult<&[RawEvent]> {
        let entry = self.index.require(date)?;
        self.lines.get(entry.range()).ok_or_else(|| {
            TraceError::InvalidData(format!(
                "date index entry {}..{} exceeds {} retained lines",
                entry.start,
                entry.end(),
                self.lines.len()
            ))
        })
    }
}

/// What happened to a line fed into the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Retained { date: NaiveDate },
    Blank,
    Malformed,
    OutOfOrder { date: NaiveDate },
}

/// Incremental date-bucket assignment.
///
/// Lines must arrive in source order. Each new date closes the gap since the
/// last filled date with zero-length entries anchored at the running retained
/// count.
#[derive(Debug, Default)]
pub struct DateIndexBuilder {
    lines: Vec<RawEvent>,
    entries: IndexMap<NaiveDate, DateIndexEntry>,
    current: Option<NaiveDate>,
    stats: ScanStats,
}

impl DateIndexBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn retained(&self) -> usize {
        self.lines.len()
    }

    /// Feeds one line. `number` is the 1-based physical line number used in diagnostics.
    pub fn push_line(&mut self, number: u64, text: &str) -> TraceResult<LineOutcome> {
        self.stats.lines_read += 1;
        if text.trim().is_empty() {
            trace!(line = number, "skipping blank line");
            return Ok(LineOutcome::Blank);
        }

        let Some(timestamp) = parse_line_timestamp(text) else {
            warn!(line = number, "invalid date, skipping line");
            self.stats.lines_malformed += 1;
            return Ok(LineOutcome::Malformed);
        };
        let date = timestamp.date();

        if let Some(current) = self.current {
            if date < current {
                warn!(
                    line = number,
                    date = %date_label(date),
                    current = %date_label(current),
                    "out-of-order date, skipping line"
                );
                self.stats.lines_out_of_order += 1;
                return Ok(LineOutcome::OutOfOrder { date });
            }
        }

        self.lines.push(RawEvent::new(timestamp, text));
        self.stats.lines_retained += 1;
        let retained = self.lines.len();

        if !self.entries.contains_key(&date) {
            let start = retained - 1;
            if let Some(current) = self.current {
                let mut day = next_day(current)?;
                while day < date {
                    self.entries.insert(day, DateIndexEntry::new(start, 0));
                    day = next_day(day)?;
                }
            }
            self.entries.insert(date, DateIndexEntry::new(start, 0));
            self.current = Some(date);
            debug!(date = %date_label(date), start, "opened date bucket");
        }

        if let Some(entry) = self.entries.get_mut(&date) {
            entry.length = retained - entry.start;
        }
        Ok(LineOutcome::Retained { date })
    }

    /// Same as `push_line` for bytes that are not valid UTF-8; always malformed.
    pub fn push_undecodable(&mut self, number: u64) -> LineOutcome {
        self.stats.lines_read += 1;
        self.stats.lines_malformed += 1;
        warn!(line = number, "line is not valid utf-8, skipping");
        LineOutcome::Malformed
    }

    /// Records a line that exceeded the reader's length limit; always malformed.
    pub fn push_oversized(&mut self, number: u64, bytes: u64) -> LineOutcome {
        self.stats.lines_read += 1;
        self.stats.lines_malformed += 1;
        warn!(line = number, bytes, "line exceeds maximum length, skipping");
        LineOutcome::Malformed
    }

    #[must_use]
    pub fn finish(self) -> IndexedLog {
        IndexedLog {
            lines: self.lines,
            index: DateIndex {
                entries: self.entries,
            },
            stats: self.stats,
        }
    }
}

/// Single-pass scan of a log stream into retained lines and a date index.
///
/// Each line is fully processed, progress callback included, before the next
/// one is pulled from `reader`. An I/O error or cancellation aborts the scan
/// without a partial result. An empty index is returned as-is; callers decide
/// whether that is fatal (see [`IndexedLog::ensure_dates`]).
pub fn scan_log<R: BufRead>(
    reader: R,
    options: &ScanOptions,
    observer: &mut dyn ProgressObserver,
) -> TraceResult<IndexedLog> {
    let mut lines = LogLines::new(reader)
        .with_max_line_bytes(options.max_line_bytes.unwrap_or(DEFAULT_MAX_LINE_BYTES));
    let mut builder = DateIndexBuilder::new();
    let mut gate = PercentageGate::default();
    let mut bytes_processed = 0u64;

    loop {
        if let Some(token) = &options.cancellation {
            if token.is_cancelled() {
                info!(lines = lines.lines_read(), "log scan cancelled");
                return Err(TraceError::Cancelled {
                    lines: lines.lines_read(),
                });
            }
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        bytes_processed += line.bytes;

        match line.text.as_deref() {
            Some(text) => {
                builder.push_line(line.number, text)?;
            }
            None if line.oversized => {
                builder.push_oversized(line.number, line.bytes);
            }
            None => {
                builder.push_undecodable(line.number);
            }
        }

        if let Some(total) = options.total_bytes {
            if gate.should_report(bytes_processed, total) {
                observer.on_progress(&Progress::determinate(
                    options.progress_message(line.number),
                    bytes_processed.min(total),
                    total,
                ));
            }
        }
    }

    builder.stats.bytes_processed = bytes_processed;
    let log = builder.finish();
    info!(
        lines_read = log.stats.lines_read,
        retained = log.stats.lines_retained,
        malformed = log.stats.lines_malformed,
        out_of_order = log.stats.lines_out_of_order,
        days = log.index.len(),
        "sensor event log indexed"
    );
    Ok(log)
}

/// Opens `path` and scans it, using the file size for progress.
pub fn scan_log_file(
    path: &Path,
    cancellation: Option<CancellationToken>,
    observer: &mut dyn ProgressObserver,
) -> TraceResult<IndexedLog> {
    let metadata = std::fs::metadata(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => TraceError::MissingPath {
            path: path.to_path_buf(),
        },
        _ => TraceError::io(format!("reading metadata of {}", path.display()), err),
    })?;
    let file = File::open(path)
        .map_err(|err| TraceError::io(format!("opening {}", path.display()), err))?;

    let mut options = ScanOptions::new()
        .with_total_bytes(metadata.len())
        .with_source_label(path.display().to_string());
    if let Some(token) = cancellation {
        options = options.with_cancellation(token);
    }
    scan_log(BufReader::new(file), &options, observer)
}
