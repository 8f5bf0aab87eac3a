use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

use crate::error::{TraceError, TraceResult};

/// Display format for calendar-date bucket labels, e.g. `Thu Jun 15 2011`.
pub const DATE_LABEL_FORMAT: &str = "%a %b %d %Y";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parses the leading timestamp field of a log line.
///
/// Offsets in RFC 3339 input are dropped in favor of the wall-clock time the
/// sensor recorded, so every event lands on the calendar day printed in the log.
#[must_use]
pub fn parse_timestamp(token: &str) -> Option<NaiveDateTime> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(token, format) {
            return Some(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(token) {
        return Some(parsed.naive_local());
    }

    NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parses the substring before the first comma of a raw log line.
#[must_use]
pub fn parse_line_timestamp(line: &str) -> Option<NaiveDateTime> {
    let token = line.split(',').next().unwrap_or_default();
    parse_timestamp(token)
}

#[must_use]
pub fn date_label(date: NaiveDate) -> String {
    date.format(DATE_LABEL_FORMAT).to_string()
}

/// Accepts either a bucket label (`Thu Jun 15 2011`) or an ISO date (`2011-06-15`).
pub fn parse_date_label(label: &str) -> TraceResult<NaiveDate> {
    let label = label.trim();
    NaiveDate::parse_from_str(label, DATE_LABEL_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(label, "%Y-%m-%d"))
        .map_err(|_| TraceError::InvalidSelection(format!("unrecognized date `{label}`")))
}

pub(crate) fn next_day(date: NaiveDate) -> TraceResult<NaiveDate> {
    date.checked_add_days(Days::new(1))
        .ok_or_else(|| TraceError::InvalidData(format!("date overflow after {date}")))
}
