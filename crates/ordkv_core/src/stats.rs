//! Database statistics and telemetry.
//!
//! Counters are atomic and readable while operations are in progress.
//! Recording is a no-op when `Config::track_stats` is false.

use std::sync::atomic::{AtomicU64, Ordering};

/// Operation counters for one database.
///
/// All counters are monotonically increasing. Counts are recorded with
/// relaxed ordering; a snapshot taken while writers are active is
/// approximate across counters but exact per counter.
#[derive(Debug, Default)]
pub(crate) struct DatabaseStats {
    enabled: bool,
    reads: AtomicU64,
    writes: AtomicU64,
    removes: AtomicU64,
    scans: AtomicU64,
    batches: AtomicU64,
    transactions_started: AtomicU64,
    transactions_committed: AtomicU64,
    transactions_discarded: AtomicU64,
    conflicts: AtomicU64,
}

impl DatabaseStats {
    /// Creates a stats instance; disabled instances record nothing.
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub(crate) fn record_read(&self) {
        if self.enabled {
            self.reads.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_write(&self) {
        if self.enabled {
            self.writes.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_remove(&self) {
        if self.enabled {
            self.removes.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_scan(&self) {
        if self.enabled {
            self.scans.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_batch(&self) {
        if self.enabled {
            self.batches.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_transaction_start(&self) {
        if self.enabled {
            self.transactions_started.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_transaction_commit(&self) {
        if self.enabled {
            self.transactions_committed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_transaction_discard(&self) {
        if self.enabled {
            self.transactions_discarded.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_conflict(&self) {
        if self.enabled {
            self.conflicts.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Reads all counters into a plain snapshot.
    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            scans: self.scans.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
            transactions_started: self.transactions_started.load(Ordering::Relaxed),
            transactions_committed: self.transactions_committed.load(Ordering::Relaxed),
            transactions_discarded: self.transactions_discarded.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of the database counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Point lookups (`get` / `contains`).
    pub reads: u64,
    /// Direct single-key writes.
    pub writes: u64,
    /// Direct single-key removals.
    pub removes: u64,
    /// Range scans.
    pub scans: u64,
    /// Direct batch writes.
    pub batches: u64,
    /// Transactions begun.
    pub transactions_started: u64,
    /// Transactions committed.
    pub transactions_committed: u64,
    /// Transactions discarded without committing.
    pub transactions_discarded: u64,
    /// Commits rejected by conflict detection.
    pub conflicts: u64,
}
