//! Accumulated phase timings.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use strata_core::PhaseTimer;

/// Totals for one named phase.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseStats {
    /// Completed start/stop pairs.
    pub calls: u64,
    /// Wall-clock time across all completed calls.
    pub total: Duration,
}

#[derive(Default)]
struct Inner {
    open: IndexMap<String, Instant>,
    stats: IndexMap<String, PhaseStats>,
}

/// [`PhaseTimer`] that accumulates call counts and wall-clock time per
/// phase, in first-seen order.
#[derive(Default)]
pub struct OperatorMetrics {
    inner: Mutex<Inner>,
}

impl OperatorMetrics {
    /// Empty metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stats for `name`, if the phase has completed at least once.
    pub fn phase(&self, name: &str) -> Option<PhaseStats> {
        self.inner.lock().ok()?.stats.get(name).copied()
    }

    /// All completed phases.
    pub fn snapshot(&self) -> Vec<(String, PhaseStats)> {
        match self.inner.lock() {
            Ok(inner) => inner
                .stats
                .iter()
                .map(|(name, stats)| (name.clone(), *stats))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Discard everything recorded so far.
    pub fn reset(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.open.clear();
            inner.stats.clear();
        }
    }
}

impl PhaseTimer for OperatorMetrics {
    fn start(&self, name: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.open.insert(name.to_string(), Instant::now());
        }
    }

    fn stop(&self, name: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            // A stop without a start is ignored.
            let Some(started) = inner.open.swap_remove(name) else {
                return;
            };
            let stats = inner.stats.entry(name.to_string()).or_default();
            stats.calls += 1;
            stats.total += started.elapsed();
        }
    }
}
