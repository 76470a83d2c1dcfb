//! # ordkv Core
//!
//! Embedded transactional engine for ordkv: an ordered key-value store
//! with named collections and optimistic snapshot transactions.
//!
//! This crate provides:
//! - [`Database`]: the facade owning collections, transactions, and
//!   statistics
//! - [`Collection`]: named, independently keyed namespaces with direct
//!   (auto-committing) operations
//! - [`Transaction`]: staged, isolated multi-operation units with
//!   commit-time conflict detection (first committer wins)
//! - Ordered range scans returning keys and value lengths
//!
//! Keys are `u64`, values are opaque [`Bytes`], and everything lives in
//! memory.
//!
//! ## Example
//!
//! ```rust
//! use ordkv_core::{Bytes, Database};
//!
//! # fn main() -> ordkv_core::Result<()> {
//! let db = Database::new();
//!
//! // Direct operations hit the main collection.
//! db.put(3, Bytes::from_static(b"x"))?;
//! assert!(db.contains(3)?);
//!
//! // Named collections are created on first reference.
//! let sub = db.collection("sub")?;
//! sub.put(3, Bytes::from_static(b"independent"))?;
//!
//! // Transactions stage writes and apply them atomically.
//! let mut txn = db.begin()?;
//! txn.put(&sub, 4, Bytes::from_static(b"staged"))?;
//! txn.commit()?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod config;
mod database;
mod error;
mod stats;
mod transaction;
mod types;

pub use collection::Collection;
pub use config::Config;
pub use database::Database;
pub use error::{Error, Result};
pub use stats::StatsSnapshot;
pub use transaction::{Transaction, TransactionStatus};
pub use types::{CollectionId, SequenceNumber, TransactionId, MAIN_COLLECTION};

// Re-exported so callers do not need direct dependencies for the
// common types that appear in this crate's API.
pub use bytes::Bytes;
pub use ordkv_storage::{Key, ScanEntry, ScanPage};
