//! Database facade and collection registry.

use crate::collection::Collection;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::stats::{DatabaseStats, StatsSnapshot};
use crate::transaction::{Transaction, TransactionManager};
use crate::types::{CollectionId, SequenceNumber, MAIN_COLLECTION};
use bytes::Bytes;
use ordkv_storage::{Key, ScanPage, Shard, ShardSnapshot};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One registered collection: its name and its storage.
struct RegistryEntry {
    name: Arc<str>,
    shard: Arc<Shard>,
}

/// The name-to-storage registry.
///
/// IDs index into `entries`; entries are never removed, so an ID minted
/// here stays valid for the database's lifetime. The main collection is
/// seeded at ID 0.
pub(crate) struct Registry {
    by_name: HashMap<String, CollectionId>,
    entries: Vec<RegistryEntry>,
}

impl Registry {
    fn new() -> Self {
        let mut registry = Self {
            by_name: HashMap::new(),
            entries: Vec::new(),
        };
        registry.create(MAIN_COLLECTION);
        registry
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<(CollectionId, Arc<str>, Arc<Shard>)> {
        let id = *self.by_name.get(name)?;
        let entry = &self.entries[id.as_u32() as usize];
        Some((id, Arc::clone(&entry.name), Arc::clone(&entry.shard)))
    }

    pub(crate) fn create(&mut self, name: &str) -> (CollectionId, Arc<str>, Arc<Shard>) {
        let id = CollectionId::new(self.entries.len() as u32);
        let entry = RegistryEntry {
            name: Arc::from(name),
            shard: Arc::new(Shard::new()),
        };
        let name_arc = Arc::clone(&entry.name);
        let shard = Arc::clone(&entry.shard);
        self.entries.push(entry);
        self.by_name.insert(name.to_owned(), id);
        (id, name_arc, shard)
    }

    /// Returns the storage for `id`.
    ///
    /// IDs are minted by this registry and entries are never removed,
    /// so indexing cannot fail for an ID obtained from the same
    /// database.
    pub(crate) fn shard(&self, id: CollectionId) -> &Arc<Shard> {
        &self.entries[id.as_u32() as usize].shard
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.name.to_string())
            .collect()
    }

    /// Snapshots every registered shard.
    pub(crate) fn snapshot_all(&self) -> HashMap<CollectionId, ShardSnapshot> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                (CollectionId::new(index as u32), entry.shard.snapshot())
            })
            .collect()
    }
}

/// State shared between the database, its collection handles, and its
/// transactions.
pub(crate) struct DatabaseShared {
    pub(crate) config: Config,
    pub(crate) registry: RwLock<Registry>,
    pub(crate) manager: TransactionManager,
    pub(crate) stats: DatabaseStats,
    open: AtomicBool,
}

impl DatabaseShared {
    pub(crate) fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::DatabaseClosed)
        }
    }

    fn close(&self) -> bool {
        self.open.swap(false, Ordering::SeqCst)
    }
}

/// The main database handle.
///
/// A `Database` owns a set of independently keyed collections and is
/// the anchor for transactions. It provides:
/// - Collection lookup with lazy creation
/// - Direct operations on the main collection (a thin delegation)
/// - Optimistic transactions with commit-time conflict detection
/// - Operation statistics
///
/// All state lives in memory; dropping (or closing) the database
/// releases it and invalidates every collection handle and open
/// transaction.
///
/// # Example
///
/// ```rust,ignore
/// use ordkv_core::{Bytes, Database};
///
/// let db = Database::new();
/// db.put(3, Bytes::from_static(b"x"))?;
///
/// let sub = db.collection("sub")?;
/// sub.put(3, Bytes::from_static(b"different"))?;
///
/// db.transaction(|txn| {
///     txn.put(&sub, 4, Bytes::from_static(b"staged"))?;
///     Ok(())
/// })?;
/// ```
pub struct Database {
    shared: Arc<DatabaseShared>,
    main: Collection,
}

impl Database {
    /// Creates a database with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a database with the given configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let stats = DatabaseStats::new(config.track_stats);
        let shared = Arc::new(DatabaseShared {
            config,
            registry: RwLock::new(Registry::new()),
            manager: TransactionManager::new(),
            stats,
            open: AtomicBool::new(true),
        });
        let main = {
            let registry = shared.registry.read();
            let (id, name, shard) = registry
                .lookup(MAIN_COLLECTION)
                .unwrap_or_else(|| unreachable!("main collection is seeded at creation"));
            Collection::new(Arc::clone(&shared), id, name, shard)
        };
        Self { shared, main }
    }

    /// Returns the collection registered under `name`, creating it on
    /// first reference.
    ///
    /// [`MAIN_COLLECTION`] resolves to the always-present main
    /// collection. Repeated calls with one name return handles to the
    /// same storage; distinct names never alias.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CollectionLimit`] when the configured maximum
    /// would be exceeded, or [`Error::DatabaseClosed`] after teardown.
    pub fn collection(&self, name: &str) -> Result<Collection> {
        self.shared.ensure_open()?;
        if let Some((id, name, shard)) = self.shared.registry.read().lookup(name) {
            return Ok(Collection::new(Arc::clone(&self.shared), id, name, shard));
        }

        let mut registry = self.shared.registry.write();
        // Raced another creator between the read and write locks.
        if let Some((id, name, shard)) = registry.lookup(name) {
            return Ok(Collection::new(Arc::clone(&self.shared), id, name, shard));
        }
        let limit = self.shared.config.max_collections;
        if registry.len() >= limit {
            return Err(Error::CollectionLimit { limit });
        }
        let (id, name_arc, shard) = registry.create(name);
        tracing::debug!(collection = %name_arc, id = id.as_u32(), "collection created");
        Ok(Collection::new(
            Arc::clone(&self.shared),
            id,
            name_arc,
            shard,
        ))
    }

    /// Returns the collection registered under `name`, if it exists.
    ///
    /// Unlike [`collection`], this never creates.
    ///
    /// [`collection`]: Database::collection
    #[must_use]
    pub fn get_collection(&self, name: &str) -> Option<Collection> {
        let (id, name, shard) = self.shared.registry.read().lookup(name)?;
        Some(Collection::new(Arc::clone(&self.shared), id, name, shard))
    }

    /// Returns a handle to the main collection.
    #[must_use]
    pub fn main_collection(&self) -> Collection {
        self.main.clone()
    }

    /// Returns the names of all collections, in registration order.
    #[must_use]
    pub fn collection_names(&self) -> Vec<String> {
        self.shared.registry.read().names()
    }

    /// Returns the value stored under `key` in the main collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseClosed`] after the database is closed.
    pub fn get(&self, key: Key) -> Result<Option<Bytes>> {
        self.main.get(key)
    }

    /// Returns true if the main collection holds a value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseClosed`] after the database is closed.
    pub fn contains(&self, key: Key) -> Result<bool> {
        self.main.contains(key)
    }

    /// Inserts or overwrites `key` in the main collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseClosed`] after the database is closed.
    pub fn put(&self, key: Key, value: impl Into<Bytes>) -> Result<()> {
        self.main.put(key, value)
    }

    /// Removes `key` from the main collection; absent keys are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseClosed`] after the database is closed.
    pub fn remove(&self, key: Key) -> Result<()> {
        self.main.remove(key)
    }

    /// Batch-writes parallel key/value sequences into the main
    /// collection.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Collection::batch_put`].
    pub fn batch_put(&self, keys: &[Key], values: &[Bytes]) -> Result<()> {
        self.main.batch_put(keys, values)
    }

    /// Scans the main collection from `start` for up to `count` keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseClosed`] after the database is closed.
    pub fn scan(&self, start: Key, count: usize) -> Result<ScanPage> {
        self.main.scan(start, count)
    }

    /// Begins a transaction reading from the current committed state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseClosed`] after the database is closed.
    pub fn begin(&self) -> Result<Transaction> {
        Transaction::begin(Arc::clone(&self.shared))
    }

    /// Executes `f` within a transaction.
    ///
    /// If `f` returns `Ok`, the transaction is committed (and a commit
    /// conflict surfaces as the returned error); if it returns `Err`,
    /// the transaction is discarded.
    ///
    /// # Errors
    ///
    /// Whatever `f` returns, or any [`Transaction::commit`] failure.
    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Transaction) -> Result<T>,
    {
        let mut txn = self.begin()?;
        match f(&mut txn) {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(err) => {
                let _ = txn.discard();
                Err(err)
            }
        }
    }

    /// Returns the sequence number of the latest committed unit.
    #[must_use]
    pub fn committed_seq(&self) -> SequenceNumber {
        SequenceNumber::new(self.shared.manager.committed_seq())
    }

    /// Returns a snapshot of the operation counters.
    ///
    /// All zeros when `Config::track_stats` is false.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }

    /// Returns the database configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// Closes the database.
    ///
    /// Idempotent. Every collection handle and open transaction becomes
    /// invalid: their operations fail with [`Error::DatabaseClosed`],
    /// and open transactions discard on drop as usual.
    pub fn close(&self) {
        if self.shared.close() {
            tracing::debug!("database closed");
        }
    }

    /// Returns true until [`close`] is called.
    ///
    /// [`close`]: Database::close
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.shared.is_open()
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("is_open", &self.is_open())
            .field("collections", &self.shared.registry.read().len())
            .field("committed_seq", &self.committed_seq())
            .finish_non_exhaustive()
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        self.close();
    }
}
