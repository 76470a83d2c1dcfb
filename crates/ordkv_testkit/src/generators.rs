//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random keys, values, batches and
//! operation sequences that maintain required invariants.

use bytes::Bytes;
use ordkv_storage::Key;
use proptest::prelude::*;

/// Strategy for keys drawn from a deliberately small range, so
/// overwrites and delete/re-insert collisions actually happen.
pub fn key_strategy() -> impl Strategy<Value = Key> {
    0u64..1024
}

/// Strategy for arbitrary byte values, empty values included.
pub fn value_strategy() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..1024).prop_map(Bytes::from)
}

/// Strategy for valid collection names.
pub fn collection_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_]{0,31}").expect("valid regex")
}

/// Strategy for equal-length parallel key/value sequences, as accepted
/// by `batch_put`. Keys may repeat within one batch.
pub fn batch_strategy(max_len: usize) -> impl Strategy<Value = (Vec<Key>, Vec<Bytes>)> {
    prop::collection::vec((key_strategy(), value_strategy()), 0..max_len)
        .prop_map(|pairs| pairs.into_iter().unzip())
}

/// One operation against a collection.
#[derive(Debug, Clone)]
pub enum TestOp {
    /// Insert or overwrite a key.
    Put(Key, Bytes),
    /// Remove a key.
    Remove(Key),
    /// Scan from a start key with a count.
    Scan(Key, usize),
}

/// Strategy for a single random operation.
pub fn op_strategy() -> impl Strategy<Value = TestOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy()).prop_map(|(k, v)| TestOp::Put(k, v)),
        1 => key_strategy().prop_map(TestOp::Remove),
        1 => (key_strategy(), 0usize..64).prop_map(|(k, n)| TestOp::Scan(k, n)),
    ]
}

/// Strategy for a sequence of random operations.
pub fn ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<TestOp>> {
    prop::collection::vec(op_strategy(), 0..max_len)
}
