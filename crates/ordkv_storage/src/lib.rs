//! # ordkv Storage
//!
//! Ordered cell storage for ordkv.
//!
//! This crate provides the lowest-level storage layer for a single
//! collection: an ordered mapping from numeric keys to versioned byte
//! values, plus the scan and snapshot machinery built on top of it.
//!
//! ## Design Principles
//!
//! - Keys are `u64` and totally ordered; the backing structure is a
//!   `BTreeMap`, so range traversal from an arbitrary key is sub-linear
//! - Values are opaque [`bytes::Bytes`] payloads; the store never
//!   interprets them
//! - Every mutation is stamped with the commit sequence number that
//!   produced it; deletions leave a tombstone carrying that stamp so
//!   later writers can be detected, while reads treat the key as absent
//! - Shards are `Send + Sync` and safe to share behind an `Arc`
//!
//! ## Example
//!
//! ```rust
//! use ordkv_storage::Shard;
//! use bytes::Bytes;
//!
//! let shard = Shard::new();
//! shard.apply_put(7, Bytes::from_static(b"y"), 1);
//! assert_eq!(shard.get(7), Some(Bytes::from_static(b"y")));
//! assert_eq!(shard.scan(0, 10).keys(), vec![7]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod scan;
mod shard;
mod snapshot;

pub use scan::{ScanEntry, ScanPage};
pub use shard::{Shard, Slot};
pub use snapshot::ShardSnapshot;

/// A key within a collection.
///
/// Keys are 64-bit unsigned integers ordered by numeric value and unique
/// within a collection.
pub type Key = u64;
