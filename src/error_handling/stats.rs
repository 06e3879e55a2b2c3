//! Failure statistics tracking.
//!
//! Thread-safe counters for every `FailureKind` observed during a run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::FailureKind;

/// Thread-safe failure statistics tracker.
///
/// All kinds are initialized to zero on creation, so lookups never miss.
/// Share across tasks with `Arc`.
pub struct FailureStats {
    counts: HashMap<FailureKind, AtomicUsize>,
}

impl FailureStats {
    /// Creates a tracker with every kind at zero.
    pub fn new() -> Self {
        let counts = FailureKind::iter()
            .map(|kind| (kind, AtomicUsize::new(0)))
            .collect();
        FailureStats { counts }
    }

    /// Counts one occurrence of `kind`.
    pub fn increment(&self, kind: FailureKind) {
        if let Some(counter) = self.counts.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment failure counter for {:?} which is not in the map",
                kind
            );
        }
    }

    /// Current count for `kind`.
    pub fn get(&self, kind: FailureKind) -> usize {
        self.counts
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Sum over all kinds.
    pub fn total(&self) -> usize {
        self.counts.values().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    /// Non-zero counters in `FailureKind` declaration order.
    pub fn non_zero(&self) -> Vec<(FailureKind, usize)> {
        FailureKind::iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

impl Default for FailureStats {
    fn default() -> Self {
        Self::new()
    }
}
