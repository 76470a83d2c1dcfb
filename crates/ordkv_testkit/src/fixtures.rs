//! Test fixtures and database helpers.
//!
//! Provides convenience functions for setting up test databases and
//! common seed data.

use bytes::Bytes;
use ordkv_core::{Collection, Config, Database};

/// A test database.
///
/// Exists so fixtures have a place to grow (seeded state, non-default
/// configuration) while tests keep dereferencing straight to
/// [`Database`].
pub struct TestDatabase {
    /// The database instance.
    pub db: Database,
}

impl TestDatabase {
    /// Creates an empty test database with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            db: Database::new(),
        }
    }

    /// Creates a test database with the given configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            db: Database::with_config(config),
        }
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Runs a test with a fresh database.
///
/// # Example
///
/// ```rust
/// use ordkv_testkit::with_db;
///
/// with_db(|db| {
///     db.put(1, bytes::Bytes::from_static(b"v")).unwrap();
///     assert!(db.contains(1).unwrap());
/// });
/// ```
pub fn with_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database) -> R,
{
    let test_db = TestDatabase::new();
    f(&test_db.db)
}

/// Creates a database whose main collection holds `count` keys.
///
/// Key `k` maps to the decimal rendering of `k` as bytes.
#[must_use]
pub fn populated_database(count: u64) -> TestDatabase {
    let test_db = TestDatabase::new();
    for k in 0..count {
        test_db
            .db
            .put(k, Bytes::from(k.to_string().into_bytes()))
            .expect("populating a fresh database cannot fail");
    }
    test_db
}

/// Seeds `col` with keys 10..=60 in steps of 10, where the value length
/// grows from 1 to 6 bytes.
///
/// The classic fixture for scan assertions: `scan(10, 6)` returns keys
/// `[10, 20, 30, 40, 50, 60]` with lengths `[1, 2, 3, 4, 5, 6]`.
pub fn seed_scan_grid(col: &Collection) {
    for (i, key) in (10..=60).step_by(10).enumerate() {
        col.put(key, Bytes::from(vec![b'a'; i + 1]))
            .expect("seeding an open database cannot fail");
    }
}
