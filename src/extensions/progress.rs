use serde::{Deserialize, Serialize};

/// Progress payload delivered to host observers.
///
/// Mirrors the `(message, is_determinate, value, total)` shape hosts use to
/// drive progress dialogs. For log scans `value`/`total` are byte counts; for
/// day materialization they are event counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub message: String,
    pub is_determinate: bool,
    pub value: u64,
    pub total: u64,
}

impl Progress {
    #[must_use]
    pub fn indeterminate(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_determinate: false,
            value: 0,
            total: 100,
        }
    }

    #[must_use]
    pub fn determinate(message: impl Into<String>, value: u64, total: u64) -> Self {
        Self {
            message: message.into(),
            is_determinate: true,
            value,
            total,
        }
    }

    /// Rounded completion percentage, `None` for indeterminate or empty totals.
    #[must_use]
    pub fn percentage(&self) -> Option<u64> {
        if !self.is_determinate || self.total == 0 {
            return None;
        }
        Some(rounded_percentage(self.value, self.total))
    }
}

/// Observer hook for long-running scans.
///
/// Observers run inline on the scanning thread: the next line is not pulled
/// until `on_progress` returns.
pub trait ProgressObserver {
    fn on_progress(&mut self, progress: &Progress);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&Progress),
{
    fn on_progress(&mut self, progress: &Progress) {
        self(progress);
    }
}

/// Observer that drops every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _progress: &Progress) {}
}

/// Emits only when the rounded percentage changes, so callback frequency is
/// bounded by 100 regardless of how many lines or events are processed.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PercentageGate {
    last: u64,
}

impl PercentageGate {
    pub(crate) fn should_report(&mut self, value: u64, total: u64) -> bool {
        if total == 0 {
            return false;
        }
        let current = rounded_percentage(value, total);
        if current == self.last {
            return false;
        }
        self.last = current;
        true
    }
}

fn rounded_percentage(value: u64, total: u64) -> u64 {
    let scaled = u128::from(value) * 100;
    let total = u128::from(total);
    ((scaled + total / 2) / total) as u64
}
