//! Running maximum of memory samples.

use labkit_parsers::byte_num_repr;

/// Tracks the largest sample seen so far.
///
/// Samples are compared by their rendered form first: a sample that prints the
/// same as the current maximum counts as unchanged even when it is larger, so
/// growth below the display precision produces no report.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PeakTracker {
    max_value: u64,
}

impl PeakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest accepted sample, zero before the first one.
    pub fn max_value(&self) -> u64 {
        self.max_value
    }

    /// Record a sample. Returns its rendering if it became the new maximum.
    pub fn observe(&mut self, value: u64) -> Option<String> {
        let rendered = byte_num_repr(value);
        if rendered == byte_num_repr(self.max_value) {
            return None;
        }
        if value > self.max_value {
            self.max_value = value;
            return Some(rendered);
        }
        None
    }
}
