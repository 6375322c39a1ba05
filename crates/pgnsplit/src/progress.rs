//! Progress observation.
//!
//! Progress is purely observational: the pipeline reports how far it got and
//! never looks at the answer. A [`Progress`] sink is passed into the pipeline
//! explicitly, so a run with [`NoProgress`] behaves exactly like a run with a
//! terminal progress bar.

use indicatif::{ProgressBar, ProgressStyle};
use std::cell::Cell;

/// Unit a progress sink is counting in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressUnit {
    /// Input bytes scanned (used when the record count is unbounded)
    Bytes,
    /// Records extracted (used when a record limit is set)
    Records,
}

/// Receiver of pipeline progress
pub trait Progress {
    /// Called once before any advance with the unit and expected total
    fn start(&self, unit: ProgressUnit, total: u64);

    /// Record forward movement by `delta` units
    fn advance(&self, delta: u64);

    /// Called once after the pipeline finished successfully
    fn finish(&self) {}
}

/// Progress sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn start(&self, _unit: ProgressUnit, _total: u64) {}

    fn advance(&self, _delta: u64) {}
}

impl Progress for ProgressBar {
    fn start(&self, unit: ProgressUnit, total: u64) {
        let template = match unit {
            ProgressUnit::Bytes => {
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})"
            }
            ProgressUnit::Records => {
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({eta})"
            }
        };
        // A template that fails to parse only costs the styling
        if let Ok(style) = ProgressStyle::default_bar().template(template) {
            self.set_style(style.progress_chars("#>-"));
        }
        self.set_length(total);
    }

    fn advance(&self, delta: u64) {
        self.inc(delta);
    }

    fn finish(&self) {
        Self::finish(self);
    }
}

/// Progress sink that remembers what it was told, for inspection in tests
/// and for callers that want totals without a display.
#[derive(Debug, Default)]
pub struct CountingProgress {
    unit: Cell<Option<ProgressUnit>>,
    total: Cell<u64>,
    position: Cell<u64>,
    updates: Cell<u64>,
    finished: Cell<bool>,
}

impl CountingProgress {
    /// Create an idle counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit announced by `start`, if it was called
    pub fn unit(&self) -> Option<ProgressUnit> {
        self.unit.get()
    }

    /// Total announced by `start`
    pub fn total(&self) -> u64 {
        self.total.get()
    }

    /// Sum of all advances
    pub fn position(&self) -> u64 {
        self.position.get()
    }

    /// Number of advance calls
    pub fn updates(&self) -> u64 {
        self.updates.get()
    }

    /// Whether `finish` was called
    pub fn is_finished(&self) -> bool {
        self.finished.get()
    }
}

impl Progress for CountingProgress {
    fn start(&self, unit: ProgressUnit, total: u64) {
        self.unit.set(Some(unit));
        self.total.set(total);
    }

    fn advance(&self, delta: u64) {
        self.position.set(self.position.get() + delta);
        self.updates.set(self.updates.get() + 1);
    }

    fn finish(&self) {
        self.finished.set(true);
    }
}
