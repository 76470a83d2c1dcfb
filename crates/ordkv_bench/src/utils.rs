//! Benchmark utilities.

use bytes::Bytes;
use ordkv_storage::Key;
use rand::Rng;

/// Generates a random value of the specified size.
#[must_use]
pub fn random_value(size: usize) -> Bytes {
    let mut rng = rand::thread_rng();
    Bytes::from((0..size).map(|_| rng.gen::<u8>()).collect::<Vec<u8>>())
}

/// Generates `count` distinct sequential keys.
#[must_use]
pub fn sequential_keys(count: usize) -> Vec<Key> {
    (0..count as u64).collect()
}

/// Generates `count` random keys in `0..range`.
#[must_use]
pub fn random_keys(count: usize, range: u64) -> Vec<Key> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| rng.gen_range(0..range)).collect()
}

/// Generates key/value pairs with the given payload size.
#[must_use]
pub fn generate_pairs(count: usize, payload_size: usize) -> (Vec<Key>, Vec<Bytes>) {
    let keys = sequential_keys(count);
    let values = (0..count).map(|_| random_value(payload_size)).collect();
    (keys, values)
}
