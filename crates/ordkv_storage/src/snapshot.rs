//! Frozen views over a shard's committed state.

use crate::scan::{scan_cells, ScanPage};
use crate::shard::Slot;
use crate::Key;
use bytes::Bytes;
use std::collections::BTreeMap;

/// An immutable copy of a shard's committed cells.
///
/// Snapshots are taken under the shard's read lock and never change
/// afterwards, so a transaction reading through one observes a single
/// point in time regardless of concurrent writers. Payloads are
/// [`Bytes`], so the copy shares value memory with the live shard.
#[derive(Debug, Clone, Default)]
pub struct ShardSnapshot {
    cells: BTreeMap<Key, Slot>,
}

impl ShardSnapshot {
    /// Creates a snapshot over already-cloned cells.
    #[must_use]
    pub fn new(cells: BTreeMap<Key, Slot>) -> Self {
        Self { cells }
    }

    /// Creates an empty snapshot.
    ///
    /// Used for collections that did not exist when the snapshot point
    /// was taken.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key` at the snapshot point.
    #[must_use]
    pub fn get(&self, key: Key) -> Option<Bytes> {
        self.cells.get(&key).and_then(|slot| slot.value().cloned())
    }

    /// Returns true if `key` held a live value at the snapshot point.
    #[must_use]
    pub fn contains(&self, key: Key) -> bool {
        self.cells
            .get(&key)
            .is_some_and(|slot| !slot.is_tombstone())
    }

    /// Returns the length of the value under `key` at the snapshot point.
    #[must_use]
    pub fn value_len(&self, key: Key) -> Option<usize> {
        self.cells.get(&key).and_then(Slot::value_len)
    }

    /// Scans the snapshot like [`Shard::scan`] scans the live store.
    ///
    /// [`Shard::scan`]: crate::Shard::scan
    #[must_use]
    pub fn scan(&self, start: Key, count: usize) -> ScanPage {
        scan_cells(&self.cells, start, count)
    }

    /// Iterates cells with key `>= start` in ascending order, tombstones
    /// included.
    ///
    /// Callers that merge an overlay on top of the snapshot need to see
    /// tombstoned keys to shadow them correctly.
    pub fn range_from(&self, start: Key) -> impl Iterator<Item = (Key, &Slot)> {
        self.cells.range(start..).map(|(key, slot)| (*key, slot))
    }

    /// Returns the number of live keys at the snapshot point.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells
            .values()
            .filter(|slot| !slot.is_tombstone())
            .count()
    }

    /// Returns true if the snapshot holds no live keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
