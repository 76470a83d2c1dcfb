//! The ordered cell store backing one collection.

use crate::scan::{scan_cells, ScanPage};
use crate::snapshot::ShardSnapshot;
use crate::Key;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// The committed state of one cell.
///
/// A deleted key keeps a [`Slot::Tombstone`] carrying the sequence number
/// of the deletion. Reads, scans and membership checks treat tombstones
/// as absent; transaction validation uses their stamp to tell "deleted
/// after your snapshot" apart from "never existed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// A live value and the sequence number of the write that produced it.
    Value {
        /// The stored payload.
        data: Bytes,
        /// Commit sequence of the last write.
        seq: u64,
    },
    /// A deleted cell and the sequence number of the deletion.
    Tombstone {
        /// Commit sequence of the deletion.
        seq: u64,
    },
}

impl Slot {
    /// Returns the sequence number of the last mutation of this cell.
    #[must_use]
    pub fn seq(&self) -> u64 {
        match self {
            Slot::Value { seq, .. } | Slot::Tombstone { seq } => *seq,
        }
    }

    /// Returns the live value, or `None` for a tombstone.
    #[must_use]
    pub fn value(&self) -> Option<&Bytes> {
        match self {
            Slot::Value { data, .. } => Some(data),
            Slot::Tombstone { .. } => None,
        }
    }

    /// Returns the live value's length, or `None` for a tombstone.
    #[must_use]
    pub fn value_len(&self) -> Option<usize> {
        self.value().map(Bytes::len)
    }

    /// Returns true if this cell is a deletion marker.
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone { .. })
    }
}

/// The ordered key-value store for a single collection.
///
/// A shard maps `u64` keys to versioned byte values, maintained in
/// ascending key order so range scans can start from any key in
/// O(log n). All methods take `&self`; interior locking makes the shard
/// safe to share behind an `Arc`.
///
/// Mutating methods take the commit sequence number to stamp into the
/// affected cells; allocating that number (and serializing writers that
/// must not interleave) is the caller's concern.
///
/// # Example
///
/// ```rust
/// use ordkv_storage::Shard;
/// use bytes::Bytes;
///
/// let shard = Shard::new();
/// shard.apply_put(3, Bytes::from_static(b"x"), 1);
/// assert!(shard.contains(3));
/// shard.apply_remove(3, 2);
/// assert!(!shard.contains(3));
/// ```
#[derive(Default)]
pub struct Shard {
    cells: RwLock<BTreeMap<Key, Slot>>,
}

impl Shard {
    /// Creates a new empty shard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: Key) -> Option<Bytes> {
        self.cells
            .read()
            .get(&key)
            .and_then(|slot| slot.value().cloned())
    }

    /// Returns true if `key` holds a live value.
    ///
    /// Agrees exactly with `get(key).is_some()`.
    #[must_use]
    pub fn contains(&self, key: Key) -> bool {
        self.cells
            .read()
            .get(&key)
            .is_some_and(|slot| !slot.is_tombstone())
    }

    /// Returns the length of the value stored under `key`, if any.
    #[must_use]
    pub fn value_len(&self, key: Key) -> Option<usize> {
        self.cells.read().get(&key).and_then(Slot::value_len)
    }

    /// Returns the sequence number of the last mutation of `key`.
    ///
    /// Tombstones count as mutations; `None` means the key was never
    /// written.
    #[must_use]
    pub fn seq_of(&self, key: Key) -> Option<u64> {
        self.cells.read().get(&key).map(Slot::seq)
    }

    /// Returns the number of live keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells
            .read()
            .values()
            .filter(|slot| !slot.is_tombstone())
            .count()
    }

    /// Returns true if the shard holds no live keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts or overwrites the value under `key`, stamped with `seq`.
    ///
    /// Overwrites may change the value's length; the previous value is
    /// replaced wholesale.
    pub fn apply_put(&self, key: Key, value: Bytes, seq: u64) {
        self.cells.write().insert(key, Slot::Value { data: value, seq });
    }

    /// Deletes `key`, leaving a tombstone stamped with `seq`.
    ///
    /// Removing an absent or already-deleted key is a no-op; the existing
    /// stamp is left untouched so unrelated readers do not conflict.
    /// Returns true if a live value was removed.
    pub fn apply_remove(&self, key: Key, seq: u64) -> bool {
        let mut cells = self.cells.write();
        match cells.get(&key) {
            Some(slot) if !slot.is_tombstone() => {
                cells.insert(key, Slot::Tombstone { seq });
                true
            }
            _ => false,
        }
    }

    /// Applies `pairs` in order under a single lock acquisition, all
    /// stamped with `seq`.
    ///
    /// Equivalent to calling [`apply_put`] for each pair in sequence
    /// order; a key repeated within the batch resolves to its last
    /// occurrence.
    ///
    /// [`apply_put`]: Shard::apply_put
    pub fn apply_batch(&self, pairs: &[(Key, Bytes)], seq: u64) {
        let mut cells = self.cells.write();
        for (key, value) in pairs {
            cells.insert(
                *key,
                Slot::Value {
                    data: value.clone(),
                    seq,
                },
            );
        }
    }

    /// Applies a group of puts and removals under one lock acquisition,
    /// all stamped with `seq`.
    ///
    /// `Some(value)` inserts or overwrites; `None` removes with the same
    /// no-op rules as [`apply_remove`]. Because the write lock is held
    /// for the whole group, readers never observe a strict subset of it.
    ///
    /// [`apply_remove`]: Shard::apply_remove
    pub fn apply_group(&self, ops: impl IntoIterator<Item = (Key, Option<Bytes>)>, seq: u64) {
        let mut cells = self.cells.write();
        for (key, op) in ops {
            match op {
                Some(data) => {
                    cells.insert(key, Slot::Value { data, seq });
                }
                None => {
                    if cells.get(&key).is_some_and(|slot| !slot.is_tombstone()) {
                        cells.insert(key, Slot::Tombstone { seq });
                    }
                }
            }
        }
    }

    /// Returns up to `count` live keys at or after `start`, ascending,
    /// with their value lengths.
    ///
    /// `start` itself is included if present and need not exist; the scan
    /// resumes at the smallest key `>= start`. A short page means the
    /// shard was exhausted.
    #[must_use]
    pub fn scan(&self, start: Key, count: usize) -> ScanPage {
        scan_cells(&self.cells.read(), start, count)
    }

    /// Returns a frozen copy of the committed cells.
    ///
    /// Values are [`Bytes`], so the clone shares payload memory with the
    /// live shard.
    #[must_use]
    pub fn snapshot(&self) -> ShardSnapshot {
        ShardSnapshot::new(self.cells.read().clone())
    }
}

impl std::fmt::Debug for Shard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shard").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(s: &'static [u8]) -> Bytes {
        Bytes::from_static(s)
    }

    #[test]
    fn put_then_get_round_trips() {
        let shard = Shard::new();
        shard.apply_put(3, b(b"x"), 1);
        assert_eq!(shard.get(3), Some(b(b"x")));
        assert!(shard.contains(3));
    }

    #[test]
    fn get_absent_is_none() {
        let shard = Shard::new();
        assert_eq!(shard.get(99), None);
        assert!(!shard.contains(99));
    }

    #[test]
    fn overwrite_replaces_value_including_length() {
        let shard = Shard::new();
        shard.apply_put(7, b(b"y"), 1);
        shard.apply_put(7, b(b"jjjjjjjj"), 2);
        assert_eq!(shard.get(7), Some(b(b"jjjjjjjj")));
        shard.apply_put(7, b(b"yy"), 3);
        assert_eq!(shard.get(7), Some(b(b"yy")));
        assert_eq!(shard.value_len(7), Some(2));
    }

    #[test]
    fn remove_leaves_tombstone_invisible_to_reads() {
        let shard = Shard::new();
        shard.apply_put(4, b(b"y"), 1);
        assert!(shard.apply_remove(4, 2));
        assert_eq!(shard.get(4), None);
        assert!(!shard.contains(4));
        // The deletion stamp stays visible to validation.
        assert_eq!(shard.seq_of(4), Some(2));
    }

    #[test]
    fn remove_absent_is_noop() {
        let shard = Shard::new();
        assert!(!shard.apply_remove(5, 1));
        assert_eq!(shard.seq_of(5), None);
    }

    #[test]
    fn remove_twice_keeps_first_stamp() {
        let shard = Shard::new();
        shard.apply_put(5, b(b"v"), 1);
        assert!(shard.apply_remove(5, 2));
        assert!(!shard.apply_remove(5, 9));
        assert_eq!(shard.seq_of(5), Some(2));
    }

    #[test]
    fn len_counts_live_keys_only() {
        let shard = Shard::new();
        shard.apply_put(1, b(b"a"), 1);
        shard.apply_put(2, b(b"b"), 2);
        shard.apply_remove(1, 3);
        assert_eq!(shard.len(), 1);
        assert!(!shard.is_empty());
    }

    #[test]
    fn batch_applies_in_order_last_write_wins() {
        let shard = Shard::new();
        let pairs = vec![(1, b(b"first")), (2, b(b"two")), (1, b(b"second"))];
        shard.apply_batch(&pairs, 1);
        assert_eq!(shard.get(1), Some(b(b"second")));
        assert_eq!(shard.get(2), Some(b(b"two")));
    }

    #[test]
    fn scan_grid_matches_lengths() {
        let shard = Shard::new();
        for (i, key) in (10..=60).step_by(10).enumerate() {
            shard.apply_put(key, Bytes::from(vec![b'a'; i + 1]), 1);
        }
        let page = shard.scan(10, 6);
        assert_eq!(page.keys(), vec![10, 20, 30, 40, 50, 60]);
        assert_eq!(page.value_lens(), vec![1, 2, 3, 4, 5, 6]);

        assert_eq!(shard.scan(20, 5).keys(), vec![20, 30, 40, 50, 60]);
        assert_eq!(shard.scan(30, 1).keys(), vec![30]);
        assert_eq!(shard.scan(60, 1).keys(), vec![60]);
        assert!(shard.scan(70, 1).is_empty());
    }

    #[test]
    fn group_applies_puts_and_removes_together() {
        let shard = Shard::new();
        shard.apply_put(1, b(b"stale"), 1);
        shard.apply_put(2, b(b"doomed"), 1);

        let ops = vec![(1, Some(b(b"fresh"))), (2, None), (3, Some(b(b"new")))];
        shard.apply_group(ops, 2);

        assert_eq!(shard.get(1), Some(b(b"fresh")));
        assert_eq!(shard.get(2), None);
        assert_eq!(shard.seq_of(2), Some(2));
        assert_eq!(shard.get(3), Some(b(b"new")));
    }

    #[test]
    fn group_remove_of_absent_key_is_noop() {
        let shard = Shard::new();
        shard.apply_group(vec![(9, None)], 1);
        assert_eq!(shard.seq_of(9), None);
    }

    #[test]
    fn snapshot_is_frozen() {
        let shard = Shard::new();
        shard.apply_put(1, b(b"old"), 1);
        let snap = shard.snapshot();
        shard.apply_put(1, b(b"new"), 2);
        shard.apply_put(2, b(b"extra"), 3);
        assert_eq!(snap.get(1), Some(b(b"old")));
        assert!(!snap.contains(2));
        assert_eq!(shard.get(1), Some(b(b"new")));
    }

    #[test]
    fn empty_value_round_trips() {
        let shard = Shard::new();
        shard.apply_put(1, Bytes::new(), 1);
        assert_eq!(shard.get(1), Some(Bytes::new()));
        assert!(shard.contains(1));
        assert_eq!(shard.scan(0, 10).value_lens(), vec![0]);
    }

    #[test]
    fn concurrent_writers_disjoint_keys() {
        use std::sync::Arc;
        use std::thread;

        let shard = Arc::new(Shard::new());
        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let shard = Arc::clone(&shard);
                thread::spawn(move || {
                    for i in 0..100u64 {
                        let key = t * 1000 + i;
                        shard.apply_put(key, Bytes::from(key.to_le_bytes().to_vec()), key);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(shard.len(), 400);
    }
}
