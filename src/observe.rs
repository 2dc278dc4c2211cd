//! Diagnostics emitted by the shortcut layer.
//!
//! The resolver doesn't log on its own; it is handed a [`ShortcutObserver`]
//! that receives a severity and message for every branch worth reporting,
//! plus a counter event per resolved query.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutEvent {
    /// Resolved through the index and materialized.
    Hit,
    /// The index has no entry for the UUID.
    NotIndexed,
    /// Index and tree disagree; the query went to a full search.
    OutOfSync,
    /// The index entry is shorter than an anchor path.
    MalformedEntry,
    /// The anchor path has the wrong root or collection.
    ShapeMismatch,
    /// The anchor resolved but nothing lives at anchor + suffix.
    Unmaterialized,
    /// No template matched, or shortcuts are disabled.
    PassThrough,
}

impl ShortcutEvent {
    pub const ALL: [ShortcutEvent; 7] = [
        ShortcutEvent::Hit,
        ShortcutEvent::NotIndexed,
        ShortcutEvent::OutOfSync,
        ShortcutEvent::MalformedEntry,
        ShortcutEvent::ShapeMismatch,
        ShortcutEvent::Unmaterialized,
        ShortcutEvent::PassThrough,
    ];
    fn slot(self) -> usize {
        self as usize
    }
}

pub trait ShortcutObserver: Send + Sync {
    fn record(&self, severity: Severity, message: &str);
    fn count(&self, _event: ShortcutEvent) {}
}

/// Forwards records to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ShortcutObserver for TracingObserver {
    fn record(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => debug!(target: "refindex::shortcut", "{message}"),
            Severity::Info => info!(target: "refindex::shortcut", "{message}"),
            Severity::Warn => warn!(target: "refindex::shortcut", "{message}"),
            Severity::Error => error!(target: "refindex::shortcut", "{message}"),
        }
    }
}

/// Counts events while logging through `tracing`.
#[derive(Debug, Default)]
pub struct ShortcutCounters {
    counts: [AtomicU64; 7],
}

impl ShortcutCounters {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get(&self, event: ShortcutEvent) -> u64 {
        self.counts[event.slot()].load(Ordering::Relaxed)
    }
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.load(Ordering::Relaxed)).sum()
    }
    pub fn snapshot(&self) -> Vec<(ShortcutEvent, u64)> {
        ShortcutEvent::ALL.iter().map(|&e| (e, self.get(e))).collect()
    }
}

impl ShortcutObserver for ShortcutCounters {
    fn record(&self, severity: Severity, message: &str) {
        TracingObserver.record(severity, message);
    }
    fn count(&self, event: ShortcutEvent) {
        self.counts[event.slot()].fetch_add(1, Ordering::Relaxed);
    }
}
