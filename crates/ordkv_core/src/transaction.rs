//! Optimistic transactions with commit-time conflict detection.
//!
//! A [`Transaction`] buffers reads and writes against a snapshot of the
//! committed state taken when it begins. Nothing touches the underlying
//! collections until [`commit`], which validates the transaction's
//! footprint against concurrent committers (first committer wins) and
//! applies every staged write under the database's commit lock as one
//! indivisible unit.
//!
//! [`commit`]: Transaction::commit

use crate::collection::Collection;
use crate::database::DatabaseShared;
use crate::error::{Error, Result};
use crate::types::{CollectionId, SequenceNumber, TransactionId};
use bytes::Bytes;
use ordkv_storage::{Key, ScanEntry, ScanPage, ShardSnapshot};
use parking_lot::{Mutex, MutexGuard};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Lifecycle state of a [`Transaction`].
///
/// A transaction starts `Open` and ends in exactly one terminal state;
/// there are no transitions out of `Committed` or `Discarded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Accepting operations; nothing applied yet.
    Open,
    /// All staged writes were applied atomically.
    Committed,
    /// All staged state was abandoned; collections are untouched.
    Discarded,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionStatus::Open => "open",
            TransactionStatus::Committed => "committed",
            TransactionStatus::Discarded => "discarded",
        };
        f.write_str(s)
    }
}

/// A buffered mutation awaiting commit.
#[derive(Debug, Clone)]
enum StagedWrite {
    Put(Bytes),
    Remove,
}

/// Allocates transaction identities and sequence numbers, and owns the
/// commit lock.
///
/// The commit lock serializes snapshot capture, direct mutations, and
/// transaction validate+apply. Holding it across validation and apply
/// closes the race where a writer slips in between the two; taking
/// snapshots under it guarantees no transaction ever captures a
/// half-applied commit.
#[derive(Debug)]
pub(crate) struct TransactionManager {
    /// Sequence of the latest committed unit. Bumped only while the
    /// commit lock is held.
    commit_seq: AtomicU64,
    next_txn_id: AtomicU64,
    commit_lock: Mutex<()>,
}

impl TransactionManager {
    pub(crate) fn new() -> Self {
        Self {
            commit_seq: AtomicU64::new(0),
            next_txn_id: AtomicU64::new(1),
            commit_lock: Mutex::new(()),
        }
    }

    /// Current committed sequence number.
    pub(crate) fn committed_seq(&self) -> u64 {
        self.commit_seq.load(Ordering::SeqCst)
    }

    /// Allocates the next transaction identity.
    pub(crate) fn next_txn_id(&self) -> TransactionId {
        TransactionId::new(self.next_txn_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Allocates the next commit sequence number.
    ///
    /// Callers must hold the commit lock; allocation happens after
    /// validation, so discarded transactions never leave gaps.
    pub(crate) fn allocate_seq(&self) -> u64 {
        self.commit_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Acquires the commit lock.
    pub(crate) fn lock(&self) -> MutexGuard<'_, ()> {
        self.commit_lock.lock()
    }
}

/// A staged, isolated view over a database's collections.
///
/// Reads consult the transaction's own staged writes first, then the
/// snapshot taken when the transaction began; concurrent commits are
/// never visible. Staged writes become visible to others only when
/// [`commit`] succeeds, all at once.
///
/// Dropping an open transaction discards it; an unterminated
/// transaction is never silently committed.
///
/// # Example
///
/// ```rust,ignore
/// let db = Database::new();
/// let col = db.collection("accounts")?;
/// let mut txn = db.begin()?;
/// txn.put(&col, 1, Bytes::from_static(b"100"))?;
/// txn.put(&col, 2, Bytes::from_static(b"200"))?;
/// txn.commit()?; // both writes appear atomically
/// ```
///
/// [`commit`]: Transaction::commit
pub struct Transaction {
    shared: Arc<DatabaseShared>,
    id: TransactionId,
    /// Committed sequence at the snapshot point.
    snapshot_seq: u64,
    /// Frozen per-collection views captured at begin. Collections
    /// created later are absent and read as empty.
    snapshots: HashMap<CollectionId, ShardSnapshot>,
    /// Pending writes, per collection, last write per key wins.
    staged: HashMap<CollectionId, BTreeMap<Key, StagedWrite>>,
    /// Point keys read (including scan results), validated at commit.
    reads: HashMap<CollectionId, BTreeSet<Key>>,
    status: TransactionStatus,
}

impl Transaction {
    pub(crate) fn begin(shared: Arc<DatabaseShared>) -> Result<Self> {
        shared.ensure_open()?;
        let (snapshot_seq, snapshots) = {
            let _commit = shared.manager.lock();
            let snapshot_seq = shared.manager.committed_seq();
            let snapshots = shared.registry.read().snapshot_all();
            (snapshot_seq, snapshots)
        };
        let id = shared.manager.next_txn_id();
        shared.stats.record_transaction_start();
        tracing::debug!(txn = id.as_u64(), seq = snapshot_seq, "transaction started");
        Ok(Self {
            shared,
            id,
            snapshot_seq,
            snapshots,
            staged: HashMap::new(),
            reads: HashMap::new(),
            status: TransactionStatus::Open,
        })
    }

    /// Returns this transaction's identity.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Returns the committed sequence number this transaction reads at.
    #[must_use]
    pub fn snapshot_seq(&self) -> SequenceNumber {
        SequenceNumber::new(self.snapshot_seq)
    }

    fn ensure_status(&self) -> Result<()> {
        match self.status {
            TransactionStatus::Open => Ok(()),
            state => Err(Error::TransactionFinished { state }),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        self.ensure_status()?;
        self.shared.ensure_open()
    }

    fn collection_id(&self, collection: &Collection) -> Result<CollectionId> {
        if Arc::ptr_eq(&self.shared, collection.shared()) {
            Ok(collection.id())
        } else {
            Err(Error::invalid_operation(
                "collection belongs to a different database",
            ))
        }
    }

    /// Returns the value this transaction observes under `key`.
    ///
    /// Staged writes shadow the snapshot; keys untouched by this
    /// transaction read from the snapshot taken at begin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransactionFinished`] on a terminal context,
    /// [`Error::DatabaseClosed`] after teardown, or
    /// [`Error::InvalidOperation`] for a foreign collection handle.
    pub fn get(&mut self, collection: &Collection, key: Key) -> Result<Option<Bytes>> {
        self.ensure_open()?;
        let id = self.collection_id(collection)?;
        self.reads.entry(id).or_default().insert(key);
        if let Some(write) = self.staged.get(&id).and_then(|writes| writes.get(&key)) {
            return Ok(match write {
                StagedWrite::Put(value) => Some(value.clone()),
                StagedWrite::Remove => None,
            });
        }
        Ok(self.snapshots.get(&id).and_then(|snap| snap.get(key)))
    }

    /// Returns true if this transaction observes a value under `key`.
    ///
    /// Agrees exactly with whether [`get`] would return a value.
    ///
    /// [`get`]: Transaction::get
    ///
    /// # Errors
    ///
    /// Same failure modes as [`get`].
    ///
    /// [`get`]: Transaction::get
    pub fn contains(&mut self, collection: &Collection, key: Key) -> Result<bool> {
        self.ensure_open()?;
        let id = self.collection_id(collection)?;
        self.reads.entry(id).or_default().insert(key);
        if let Some(write) = self.staged.get(&id).and_then(|writes| writes.get(&key)) {
            return Ok(matches!(write, StagedWrite::Put(_)));
        }
        Ok(self
            .snapshots
            .get(&id)
            .is_some_and(|snap| snap.contains(key)))
    }

    /// Stages an insert or overwrite of `key`.
    ///
    /// Visible to this transaction's own subsequent reads, and to no one
    /// else until commit.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`get`].
    ///
    /// [`get`]: Transaction::get
    pub fn put(&mut self, collection: &Collection, key: Key, value: impl Into<Bytes>) -> Result<()> {
        self.ensure_open()?;
        let id = self.collection_id(collection)?;
        self.staged
            .entry(id)
            .or_default()
            .insert(key, StagedWrite::Put(value.into()));
        Ok(())
    }

    /// Stages a removal of `key`.
    ///
    /// Staging a removal of an absent key is permitted; applying it is a
    /// no-op, but the key still counts as written for conflict
    /// detection.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`get`].
    ///
    /// [`get`]: Transaction::get
    pub fn remove(&mut self, collection: &Collection, key: Key) -> Result<()> {
        self.ensure_open()?;
        let id = self.collection_id(collection)?;
        self.staged
            .entry(id)
            .or_default()
            .insert(key, StagedWrite::Remove);
        Ok(())
    }

    /// Stages `keys[i] -> values[i]` for every index, in order.
    ///
    /// A key repeated within the batch (or already staged) resolves to
    /// its last occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BatchLengthMismatch`] before staging anything
    /// when the sequences differ in length; otherwise the same failure
    /// modes as [`get`].
    ///
    /// [`get`]: Transaction::get
    pub fn batch_put(
        &mut self,
        collection: &Collection,
        keys: &[Key],
        values: &[Bytes],
    ) -> Result<()> {
        self.ensure_open()?;
        let id = self.collection_id(collection)?;
        if keys.len() != values.len() {
            return Err(Error::BatchLengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        let staged = self.staged.entry(id).or_default();
        for (key, value) in keys.iter().zip(values) {
            staged.insert(*key, StagedWrite::Put(value.clone()));
        }
        Ok(())
    }

    /// Scans the transaction's view of `collection`: the staged overlay
    /// merged with the snapshot, in ascending key order.
    ///
    /// Staged removals hide snapshot keys; staged puts supply their own
    /// value lengths. Returned keys join the read-set for conflict
    /// detection.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`get`].
    ///
    /// [`get`]: Transaction::get
    pub fn scan(&mut self, collection: &Collection, start: Key, count: usize) -> Result<ScanPage> {
        self.ensure_open()?;
        let id = self.collection_id(collection)?;

        let empty_overlay = BTreeMap::new();
        let empty_snapshot = ShardSnapshot::empty();
        let entries = {
            let overlay = self.staged.get(&id).unwrap_or(&empty_overlay);
            let snapshot = self.snapshots.get(&id).unwrap_or(&empty_snapshot);
            let mut entries: Vec<ScanEntry> = Vec::new();
            let mut snap_iter = snapshot.range_from(start).peekable();
            let mut overlay_iter = overlay.range(start..).peekable();
            while entries.len() < count {
                let take_overlay = match (snap_iter.peek(), overlay_iter.peek()) {
                    (None, None) => break,
                    (Some(_), None) => false,
                    (None, Some(_)) => true,
                    // The overlay shadows the snapshot on equal keys.
                    (Some((snap_key, _)), Some((overlay_key, _))) => **overlay_key <= *snap_key,
                };
                if take_overlay {
                    let Some((key, write)) = overlay_iter.next() else {
                        break;
                    };
                    if snap_iter.peek().is_some_and(|(snap_key, _)| *snap_key == *key) {
                        snap_iter.next();
                    }
                    if let StagedWrite::Put(value) = write {
                        entries.push(ScanEntry {
                            key: *key,
                            value_len: value.len(),
                        });
                    }
                } else {
                    let Some((key, slot)) = snap_iter.next() else {
                        break;
                    };
                    if let Some(value_len) = slot.value_len() {
                        entries.push(ScanEntry { key, value_len });
                    }
                }
            }
            entries
        };

        let reads = self.reads.entry(id).or_default();
        for entry in &entries {
            reads.insert(entry.key);
        }
        Ok(ScanPage::new(entries))
    }

    /// Atomically applies all staged writes and moves to `Committed`.
    ///
    /// Validation runs first, under the commit lock: if any key this
    /// transaction read or wrote carries a committed mutation newer than
    /// the snapshot point (deletions included), nothing is applied,
    /// the transaction moves to `Discarded`, and
    /// [`Error::TransactionConflict`] is returned. The caller may retry
    /// with a fresh transaction.
    ///
    /// On success every staged write is applied with a single newly
    /// allocated sequence number while the lock is held, so no reader
    /// with a consistent view observes a partial subset.
    ///
    /// # Errors
    ///
    /// [`Error::TransactionConflict`] on conflict,
    /// [`Error::TransactionFinished`] on a terminal context, or
    /// [`Error::DatabaseClosed`] if the database was torn down.
    pub fn commit(&mut self) -> Result<SequenceNumber> {
        self.ensure_status()?;
        let shared = Arc::clone(&self.shared);
        let _commit = shared.manager.lock();

        if !shared.is_open() {
            self.finish(TransactionStatus::Discarded);
            shared.stats.record_transaction_discard();
            return Err(Error::DatabaseClosed);
        }

        let registry = shared.registry.read();

        let mut conflict: Option<(CollectionId, Key)> = None;
        'validate: for (&id, keys) in &self.reads {
            let shard = registry.shard(id);
            for &key in keys {
                if shard.seq_of(key).unwrap_or(0) > self.snapshot_seq {
                    conflict = Some((id, key));
                    break 'validate;
                }
            }
        }
        if conflict.is_none() {
            'validate_writes: for (&id, writes) in &self.staged {
                let shard = registry.shard(id);
                for &key in writes.keys() {
                    if shard.seq_of(key).unwrap_or(0) > self.snapshot_seq {
                        conflict = Some((id, key));
                        break 'validate_writes;
                    }
                }
            }
        }

        if let Some((collection, key)) = conflict {
            drop(registry);
            self.finish(TransactionStatus::Discarded);
            shared.stats.record_conflict();
            tracing::debug!(
                txn = self.id.as_u64(),
                collection = collection.as_u32(),
                key,
                "commit rejected: conflicting concurrent write"
            );
            return Err(Error::TransactionConflict { collection, key });
        }

        let seq = shared.manager.allocate_seq();
        let staged = std::mem::take(&mut self.staged);
        for (id, writes) in staged {
            let ops = writes.into_iter().map(|(key, write)| match write {
                StagedWrite::Put(value) => (key, Some(value)),
                StagedWrite::Remove => (key, None),
            });
            // One lock acquisition per collection: concurrent readers see
            // this transaction's writes all at once or not at all.
            registry.shard(id).apply_group(ops, seq);
        }
        drop(registry);

        self.finish(TransactionStatus::Committed);
        shared.stats.record_transaction_commit();
        tracing::debug!(txn = self.id.as_u64(), seq, "transaction committed");
        Ok(SequenceNumber::new(seq))
    }

    /// Abandons all staged state and moves to `Discarded`.
    ///
    /// The underlying collections are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransactionFinished`] on a terminal context.
    pub fn discard(&mut self) -> Result<()> {
        self.ensure_status()?;
        self.finish(TransactionStatus::Discarded);
        self.shared.stats.record_transaction_discard();
        tracing::debug!(txn = self.id.as_u64(), "transaction discarded");
        Ok(())
    }

    fn finish(&mut self, status: TransactionStatus) {
        self.status = status;
        self.staged.clear();
        self.reads.clear();
        self.snapshots.clear();
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.status == TransactionStatus::Open {
            self.finish(TransactionStatus::Discarded);
            self.shared.stats.record_transaction_discard();
            tracing::debug!(
                txn = self.id.as_u64(),
                "open transaction dropped; staged state discarded"
            );
        }
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("snapshot_seq", &self.snapshot_seq)
            .field("staged_collections", &self.staged.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn b(s: &'static [u8]) -> Bytes {
        Bytes::from_static(s)
    }

    #[test]
    fn staged_writes_invisible_until_commit() {
        let db = Database::new();
        let col = db.collection("c").unwrap();

        let mut txn = db.begin().unwrap();
        txn.put(&col, 1, b(b"v")).unwrap();

        assert_eq!(col.get(1).unwrap(), None);
        assert_eq!(txn.get(&col, 1).unwrap(), Some(b(b"v")));

        txn.commit().unwrap();
        assert_eq!(col.get(1).unwrap(), Some(b(b"v")));
    }

    #[test]
    fn discard_leaves_collections_untouched() {
        let db = Database::new();
        let col = db.collection("c").unwrap();
        col.put(1, b(b"before")).unwrap();

        let mut txn = db.begin().unwrap();
        txn.put(&col, 1, b(b"changed")).unwrap();
        txn.remove(&col, 1).unwrap();
        txn.discard().unwrap();

        assert_eq!(col.get(1).unwrap(), Some(b(b"before")));
    }

    #[test]
    fn drop_discards_open_transaction() {
        let db = Database::new();
        let col = db.collection("c").unwrap();
        {
            let mut txn = db.begin().unwrap();
            txn.put(&col, 1, b(b"v")).unwrap();
        }
        assert_eq!(col.get(1).unwrap(), None);
        assert_eq!(db.stats().transactions_discarded, 1);
    }

    #[test]
    fn terminal_states_reject_reuse() {
        let db = Database::new();
        let mut txn = db.begin().unwrap();
        txn.commit().unwrap();
        assert!(matches!(
            txn.commit(),
            Err(Error::TransactionFinished {
                state: TransactionStatus::Committed
            })
        ));
        assert!(matches!(
            txn.discard(),
            Err(Error::TransactionFinished {
                state: TransactionStatus::Committed
            })
        ));

        let mut txn = db.begin().unwrap();
        txn.discard().unwrap();
        assert!(matches!(
            txn.commit(),
            Err(Error::TransactionFinished {
                state: TransactionStatus::Discarded
            })
        ));
    }

    #[test]
    fn snapshot_hides_later_commits() {
        let db = Database::new();
        let col = db.collection("c").unwrap();
        col.put(1, b(b"initial")).unwrap();

        let mut reader = db.begin().unwrap();
        assert_eq!(reader.get(&col, 1).unwrap(), Some(b(b"initial")));

        col.put(1, b(b"updated")).unwrap();
        col.put(2, b(b"new")).unwrap();

        assert_eq!(reader.get(&col, 1).unwrap(), Some(b(b"initial")));
        assert!(!reader.contains(&col, 2).unwrap());
    }

    #[test]
    fn write_write_conflict_second_commit_fails() {
        let db = Database::new();
        let col = db.collection("c").unwrap();
        col.put(1, b(b"base")).unwrap();

        let mut first = db.begin().unwrap();
        let mut second = db.begin().unwrap();
        first.put(&col, 1, b(b"first")).unwrap();
        second.put(&col, 1, b(b"second")).unwrap();

        first.commit().unwrap();
        let err = second.commit().unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(col.get(1).unwrap(), Some(b(b"first")));
        assert_eq!(db.stats().conflicts, 1);
    }

    #[test]
    fn read_write_conflict_detected() {
        let db = Database::new();
        let col = db.collection("c").unwrap();
        col.put(1, b(b"base")).unwrap();

        let mut txn = db.begin().unwrap();
        assert_eq!(txn.get(&col, 1).unwrap(), Some(b(b"base")));
        txn.put(&col, 2, b(b"derived")).unwrap();

        // A direct write to the key the transaction read invalidates it.
        col.put(1, b(b"moved")).unwrap();

        assert!(txn.commit().unwrap_err().is_conflict());
        assert!(!col.contains(2).unwrap());
    }

    #[test]
    fn delete_after_snapshot_conflicts_with_reader() {
        let db = Database::new();
        let col = db.collection("c").unwrap();
        col.put(1, b(b"base")).unwrap();

        let mut txn = db.begin().unwrap();
        assert!(txn.contains(&col, 1).unwrap());
        txn.put(&col, 5, b(b"out")).unwrap();

        col.remove(1).unwrap();

        assert!(txn.commit().unwrap_err().is_conflict());
    }

    #[test]
    fn disjoint_transactions_both_commit() {
        let db = Database::new();
        let col = db.collection("c").unwrap();

        let mut a = db.begin().unwrap();
        let mut c = db.begin().unwrap();
        a.put(&col, 1, b(b"a")).unwrap();
        c.put(&col, 2, b(b"c")).unwrap();

        a.commit().unwrap();
        c.commit().unwrap();
        assert_eq!(col.get(1).unwrap(), Some(b(b"a")));
        assert_eq!(col.get(2).unwrap(), Some(b(b"c")));
    }

    #[test]
    fn read_your_own_writes_and_removes() {
        let db = Database::new();
        let col = db.collection("c").unwrap();
        col.put(1, b(b"old")).unwrap();

        let mut txn = db.begin().unwrap();
        txn.put(&col, 1, b(b"new")).unwrap();
        assert_eq!(txn.get(&col, 1).unwrap(), Some(b(b"new")));

        txn.remove(&col, 1).unwrap();
        assert_eq!(txn.get(&col, 1).unwrap(), None);
        assert!(!txn.contains(&col, 1).unwrap());

        txn.commit().unwrap();
        assert!(!col.contains(1).unwrap());
    }

    #[test]
    fn scan_merges_overlay_with_snapshot() {
        let db = Database::new();
        let col = db.collection("c").unwrap();
        col.put(10, b(b"a")).unwrap();
        col.put(20, b(b"aa")).unwrap();
        col.put(30, b(b"aaa")).unwrap();

        let mut txn = db.begin().unwrap();
        txn.put(&col, 15, b(b"xx")).unwrap(); // insert between
        txn.put(&col, 20, b(b"xxxx")).unwrap(); // overwrite, new length
        txn.remove(&col, 30).unwrap(); // hide

        let page = txn.scan(&col, 10, 10).unwrap();
        assert_eq!(page.keys(), vec![10, 15, 20]);
        assert_eq!(page.value_lens(), vec![1, 2, 4]);

        // The live collection is unchanged until commit.
        assert_eq!(col.scan(10, 10).unwrap().keys(), vec![10, 20, 30]);
    }

    #[test]
    fn scan_respects_count_and_start() {
        let db = Database::new();
        let col = db.collection("c").unwrap();
        col.put(10, b(b"a")).unwrap();

        let mut txn = db.begin().unwrap();
        txn.put(&col, 20, b(b"bb")).unwrap();
        txn.put(&col, 30, b(b"ccc")).unwrap();

        assert_eq!(txn.scan(&col, 15, 1).unwrap().keys(), vec![20]);
        assert!(txn.scan(&col, 0, 0).unwrap().is_empty());
        assert!(txn.scan(&col, 31, 5).unwrap().is_empty());
    }

    #[test]
    fn collection_created_after_begin_reads_empty() {
        let db = Database::new();
        let mut txn = db.begin().unwrap();

        let late = db.collection("late").unwrap();
        late.put(1, b(b"outside")).unwrap();

        assert_eq!(txn.get(&late, 1).unwrap(), None);
        assert!(txn.scan(&late, 0, 10).unwrap().is_empty());
    }

    #[test]
    fn foreign_collection_handle_rejected() {
        let db = Database::new();
        let other = Database::new();
        let foreign = other.collection("c").unwrap();

        let mut txn = db.begin().unwrap();
        assert!(matches!(
            txn.put(&foreign, 1, b(b"v")),
            Err(Error::InvalidOperation { .. })
        ));
    }

    #[test]
    fn batch_mismatch_stages_nothing() {
        let db = Database::new();
        let col = db.collection("c").unwrap();
        let mut txn = db.begin().unwrap();
        assert!(matches!(
            txn.batch_put(&col, &[1, 2], &[b(b"only")]),
            Err(Error::BatchLengthMismatch { keys: 2, values: 1 })
        ));
        txn.commit().unwrap();
        assert!(col.is_empty());
    }

    #[test]
    fn commit_after_close_fails_and_discards() {
        let db = Database::new();
        let col = db.collection("c").unwrap();
        let mut txn = db.begin().unwrap();
        txn.put(&col, 1, b(b"v")).unwrap();
        db.close();
        assert!(matches!(txn.commit(), Err(Error::DatabaseClosed)));
        assert_eq!(txn.status(), TransactionStatus::Discarded);
    }
}
