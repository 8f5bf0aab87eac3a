use std::io::{BufRead, ErrorKind, Read};

use crate::error::{TraceError, TraceResult};

/// Longest line body kept in memory, terminator excluded.
pub const DEFAULT_MAX_LINE_BYTES: usize = 1 << 20;

/// One physical line pulled from a log stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// 1-based physical line number.
    pub number: u64,
    /// Line text with the terminator removed. `None` when the bytes were not
    /// UTF-8 or the line was longer than the reader's limit.
    pub text: Option<String>,
    /// Bytes consumed from the stream for this line, terminator included.
    pub bytes: u64,
    /// The line exceeded the length limit; its body was skipped, not buffered.
    pub oversized: bool,
}

/// Lazy, finite, non-restartable sequence of lines over a buffered reader.
///
/// Nothing is read ahead: each `next` call performs exactly one `read_until`
/// so the consumer decides when the next line is produced. At most
/// `max_line_bytes` plus the terminator is buffered per line.
pub struct LogLines<R> {
    reader: R,
    buffer: Vec<u8>,
    number: u64,
    max_line_bytes: usize,
    finished: bool,
}

impl<R: BufRead> LogLines<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(256),
            number: 0,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            finished: false,
        }
    }

    #[must_use]
    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes;
        self
    }

    /// Number of lines produced so far.
    #[must_use]
    pub fn lines_read(&self) -> u64 {
        self.number
    }

    fn read_next(&mut self) -> TraceResult<Option<LogLine>> {
        self.buffer.clear();
        let limit = (self.max_line_bytes as u64).saturating_add(2);
        let mut bytes = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut self.buffer)
            .map_err(|err| TraceError::io(format!("reading log line {}", self.number + 1), err))?
            as u64;
        if bytes == 0 {
            return Ok(None);
        }

        self.number += 1;
        let terminated = self.buffer.last() == Some(&b'\n');
        let mut end = self.buffer.len();
        if terminated {
            end -= 1;
            if end > 0 && self.buffer[end - 1] == b'\r' {
                end -= 1;
            }
        }

        let oversized = end > self.max_line_bytes || (!terminated && bytes == limit);
        if oversized {
            if !terminated {
                bytes += self.skip_rest_of_line()?;
            }
            self.buffer.clear();
            return Ok(Some(LogLine {
                number: self.number,
                text: None,
                bytes,
                oversized: true,
            }));
        }

        let text = std::str::from_utf8(&self.buffer[..end])
            .ok()
            .map(str::to_owned);

        Ok(Some(LogLine {
            number: self.number,
            text,
            bytes,
            oversized: false,
        }))
    }

    /// Discards input up to and including the next newline, returning the
    /// number of bytes skipped.
    fn skip_rest_of_line(&mut self) -> TraceResult<u64> {
        let mut skipped = 0u64;
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    return Err(TraceError::io(
                        format!("skipping oversized log line {}", self.number),
                        err,
                    ));
                }
            };
            if available.is_empty() {
                return Ok(skipped);
            }
            let (consumed, done) = match available.iter().position(|byte| *byte == b'\n') {
                Some(position) => (position + 1, true),
                None => (available.len(), false),
            };
            self.reader.consume(consumed);
            skipped += consumed as u64;
            if done {
                return Ok(skipped);
            }
        }
    }
}

impl<R: BufRead> Iterator for LogLines<R> {
    type Item = TraceResult<LogLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_next() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
