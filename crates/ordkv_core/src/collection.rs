//! Collection handles and direct (auto-committing) operations.

use crate::database::DatabaseShared;
use crate::error::{Error, Result};
use crate::types::CollectionId;
use bytes::Bytes;
use ordkv_storage::{Key, ScanPage, Shard};
use std::sync::Arc;

/// A handle to one named key-value namespace within a database.
///
/// Collections map `u64` keys to opaque byte values, kept in ascending
/// key order. Handles are cheap to clone and safe to share across
/// threads; all handles for one name refer to the same storage.
///
/// Direct mutations behave as one-operation transactions that
/// auto-commit immediately: each serializes through the database's
/// commit lock and is stamped with a freshly allocated sequence number
/// (batches receive a single number). Reads and scans run against the
/// current committed state without that lock.
///
/// # Example
///
/// ```rust,ignore
/// let db = Database::new();
/// let sub = db.collection("sub")?;
/// sub.put(3, Bytes::from_static(b"x"))?;
/// assert!(sub.contains(3)?);
/// ```
#[derive(Clone)]
pub struct Collection {
    shared: Arc<DatabaseShared>,
    id: CollectionId,
    name: Arc<str>,
    shard: Arc<Shard>,
}

impl Collection {
    pub(crate) fn new(
        shared: Arc<DatabaseShared>,
        id: CollectionId,
        name: Arc<str>,
        shard: Arc<Shard>,
    ) -> Self {
        Self {
            shared,
            id,
            name,
            shard,
        }
    }

    /// Returns the collection's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the collection's ID.
    #[must_use]
    pub fn id(&self) -> CollectionId {
        self.id
    }

    pub(crate) fn shared(&self) -> &Arc<DatabaseShared> {
        &self.shared
    }

    pub(crate) fn shard(&self) -> &Arc<Shard> {
        &self.shard
    }

    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseClosed`] after the database is closed.
    pub fn get(&self, key: Key) -> Result<Option<Bytes>> {
        self.shared.ensure_open()?;
        self.shared.stats.record_read();
        Ok(self.shard.get(key))
    }

    /// Returns true if `key` holds a value.
    ///
    /// Agrees exactly with whether [`get`] would return a value.
    ///
    /// [`get`]: Collection::get
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseClosed`] after the database is closed.
    pub fn contains(&self, key: Key) -> Result<bool> {
        self.shared.ensure_open()?;
        self.shared.stats.record_read();
        Ok(self.shard.contains(key))
    }

    /// Inserts or overwrites the value under `key`.
    ///
    /// Overwrites replace the previous value wholesale, including
    /// changing its length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseClosed`] after the database is closed.
    pub fn put(&self, key: Key, value: impl Into<Bytes>) -> Result<()> {
        self.shared.ensure_open()?;
        let value = value.into();
        let _commit = self.shared.manager.lock();
        let seq = self.shared.manager.allocate_seq();
        self.shard.apply_put(key, value, seq);
        self.shared.stats.record_write();
        Ok(())
    }

    /// Removes `key`.
    ///
    /// Removing an absent key is a no-op, not an error; removing twice
    /// is a no-op both times.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseClosed`] after the database is closed.
    pub fn remove(&self, key: Key) -> Result<()> {
        self.shared.ensure_open()?;
        let _commit = self.shared.manager.lock();
        let seq = self.shared.manager.allocate_seq();
        self.shard.apply_remove(key, seq);
        self.shared.stats.record_remove();
        Ok(())
    }

    /// Writes `keys[i] -> values[i]` for every index, atomically.
    ///
    /// The final state equals applying each pair with [`put`] in
    /// sequence order; a key repeated within the batch resolves to its
    /// last occurrence. The whole batch is applied under one lock
    /// acquisition with one sequence number.
    ///
    /// [`put`]: Collection::put
    ///
    /// # Errors
    ///
    /// Returns [`Error::BatchLengthMismatch`] before any mutation when
    /// the sequences differ in length, or [`Error::DatabaseClosed`]
    /// after the database is closed.
    pub fn batch_put(&self, keys: &[Key], values: &[Bytes]) -> Result<()> {
        self.shared.ensure_open()?;
        if keys.len() != values.len() {
            return Err(Error::BatchLengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        let pairs: Vec<(Key, Bytes)> = keys.iter().copied().zip(values.iter().cloned()).collect();
        let _commit = self.shared.manager.lock();
        let seq = self.shared.manager.allocate_seq();
        self.shard.apply_batch(&pairs, seq);
        self.shared.stats.record_batch();
        Ok(())
    }

    /// Returns up to `count` keys at or after `start` in ascending
    /// order, with the length of each key's value.
    ///
    /// `start` need not exist; the scan resumes at the smallest key
    /// `>= start`. A count of zero returns an empty page and a short
    /// page means the collection was exhausted; neither is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseClosed`] after the database is closed.
    pub fn scan(&self, start: Key, count: usize) -> Result<ScanPage> {
        self.shared.ensure_open()?;
        self.shared.stats.record_scan();
        Ok(self.shard.scan(start, count))
    }

    /// Returns the number of keys holding a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shard.len()
    }

    /// Returns true if the collection holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shard.is_empty()
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;
    use bytes::Bytes;

    fn b(s: &'static [u8]) -> Bytes {
        Bytes::from_static(s)
    }

    #[test]
    fn put_get_contains_remove() {
        let db = Database::new();
        let col = db.collection("users").unwrap();

        col.put(3, b(b"x")).unwrap();
        col.put(4, b(b"y")).unwrap();
        assert!(col.contains(3).unwrap());
        assert_eq!(col.get(3).unwrap(), Some(b(b"x")));
        assert_ne!(col.get(4).unwrap(), Some(b(b"yy")));

        col.remove(3).unwrap();
        col.remove(4).unwrap();
        assert!(!col.contains(3).unwrap());
        assert!(!col.contains(4).unwrap());
    }

    #[test]
    fn remove_absent_twice_is_noop() {
        let db = Database::new();
        let col = db.collection("users").unwrap();
        col.remove(9).unwrap();
        col.remove(9).unwrap();
        assert!(!col.contains(9).unwrap());
    }

    #[test]
    fn overwrite_changes_length() {
        let db = Database::new();
        let col = db.collection("c").unwrap();
        col.put(7, b(b"y")).unwrap();
        col.put(7, b(b"jjjjjjjj")).unwrap();
        assert_eq!(col.get(7).unwrap(), Some(b(b"jjjjjjjj")));
        col.put(7, b(b"yy")).unwrap();
        assert_eq!(col.get(7).unwrap(), Some(b(b"yy")));
    }

    #[test]
    fn batch_put_equals_sequential_puts() {
        let db = Database::new();
        let seq = db.collection("seq").unwrap();
        let bat = db.collection("bat").unwrap();

        let keys: Vec<u64> = vec![1, 2, 3, 2];
        let values: Vec<Bytes> = vec![b(b"a"), b(b"b"), b(b"c"), b(b"later")];
        for (k, v) in keys.iter().zip(&values) {
            seq.put(*k, v.clone()).unwrap();
        }
        bat.batch_put(&keys, &values).unwrap();

        for k in [1u64, 2, 3] {
            assert_eq!(bat.get(k).unwrap(), seq.get(k).unwrap());
        }
        assert_eq!(bat.get(2).unwrap(), Some(b(b"later")));
    }

    #[test]
    fn batch_length_mismatch_rejected_eagerly() {
        let db = Database::new();
        let col = db.collection("c").unwrap();
        let err = col.batch_put(&[1, 2, 3], &[b(b"a")]).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::BatchLengthMismatch { keys: 3, values: 1 }
        ));
        // Nothing was applied.
        assert!(col.is_empty());
    }

    #[test]
    fn len_counts_live_keys() {
        let db = Database::new();
        let col = db.collection("c").unwrap();
        assert!(col.is_empty());
        col.put(1, b(b"a")).unwrap();
        col.put(2, b(b"b")).unwrap();
        col.remove(1).unwrap();
        assert_eq!(col.len(), 1);
    }

    #[test]
    fn handles_alias_same_storage() {
        let db = Database::new();
        let a = db.collection("shared").unwrap();
        let b_handle = db.collection("shared").unwrap();
        a.put(1, b(b"v")).unwrap();
        assert_eq!(b_handle.get(1).unwrap(), Some(b(b"v")));
        assert_eq!(a.id(), b_handle.id());
    }

    #[test]
    fn closed_database_rejects_operations() {
        let db = Database::new();
        let col = db.collection("c").unwrap();
        db.close();
        assert!(matches!(col.get(1), Err(crate::Error::DatabaseClosed)));
        assert!(matches!(
            col.put(1, b(b"v")),
            Err(crate::Error::DatabaseClosed)
        ));
        assert!(matches!(col.scan(0, 1), Err(crate::Error::DatabaseClosed)));
    }
}
