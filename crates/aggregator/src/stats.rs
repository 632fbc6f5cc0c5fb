use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Statistics about one aggregation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationStats {
    /// Number of path specs scheduled
    pub specs: usize,

    /// Number of files that produced a fragment
    pub files: usize,

    /// Claims refused because the file was already scheduled
    pub duplicates: usize,

    /// Files claimed but not readable
    pub read_failures: usize,

    /// Walks cut short (missing root or unreadable directory)
    pub walk_errors: usize,

    /// Tasks that panicked
    pub task_failures: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

/// Lock-free counters shared by the tasks of a running aggregation.
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    files: AtomicUsize,
    duplicates: AtomicUsize,
    read_failures: AtomicUsize,
    walk_errors: AtomicUsize,
}

impl StatsCounters {
    pub(crate) fn add_file(&self) {
        self.files.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_read_failure(&self) {
        self.read_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_walk_error(&self) {
        self.walk_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(
        &self,
        specs: usize,
        task_failures: usize,
        time_ms: u64,
    ) -> AggregationStats {
        AggregationStats {
            specs,
            files: self.files.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            read_failures: self.read_failures.load(Ordering::Relaxed),
            walk_errors: self.walk_errors.load(Ordering::Relaxed),
            task_failures,
            time_ms,
        }
    }
}
