//! Concurrent mixed-workload driver for stress testing.

use bytes::Bytes;
use ordkv_core::{Database, Error};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

/// Outcome counters from one [`run_mixed_workload`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkloadReport {
    /// Direct operations executed (puts, removes, scans).
    pub direct_ops: u64,
    /// Transactions that committed.
    pub committed: u64,
    /// Transactions rejected with a conflict.
    pub conflicts: u64,
}

/// Runs `threads` workers, each performing `ops_per_thread` random
/// operations against the collection `"stress"`: direct puts, removes
/// and scans, plus small read-modify-write transactions over a shared
/// key range.
///
/// Conflicts are expected and counted, never retried. Every other error
/// is a bug and panics the worker.
pub fn run_mixed_workload(db: &Database, threads: usize, ops_per_thread: usize) -> WorkloadReport {
    let direct_ops = AtomicU64::new(0);
    let committed = AtomicU64::new(0);
    let conflicts = AtomicU64::new(0);

    thread::scope(|scope| {
        for worker in 0..threads {
            let direct_ops = &direct_ops;
            let committed = &committed;
            let conflicts = &conflicts;
            scope.spawn(move || {
                let col = db.collection("stress").expect("database is open");
                let mut rng = StdRng::seed_from_u64(0xbeef + worker as u64);
                for _ in 0..ops_per_thread {
                    match rng.gen_range(0..10u8) {
                        0..=4 => {
                            let key = rng.gen_range(0..256u64);
                            let len = rng.gen_range(0..64usize);
                            col.put(key, Bytes::from(vec![worker as u8; len]))
                                .expect("direct put on open database");
                            direct_ops.fetch_add(1, Ordering::Relaxed);
                        }
                        5 => {
                            let key = rng.gen_range(0..256u64);
                            col.remove(key).expect("direct remove on open database");
                            direct_ops.fetch_add(1, Ordering::Relaxed);
                        }
                        6 => {
                            let start = rng.gen_range(0..256u64);
                            let count = rng.gen_range(0..32usize);
                            let page = col.scan(start, count).expect("scan on open database");
                            assert!(page.len() <= count);
                            direct_ops.fetch_add(1, Ordering::Relaxed);
                        }
                        _ => {
                            let base = rng.gen_range(0..252u64);
                            let mut txn = db.begin().expect("begin on open database");
                            let observed = txn.get(&col, base).expect("transactional read");
                            let next = observed.map_or(0, |v| v.len() + 1);
                            txn.put(&col, base, Bytes::from(vec![0u8; next % 64]))
                                .expect("transactional put");
                            txn.put(&col, base + 1, Bytes::from_static(b"linked"))
                                .expect("transactional put");
                            match txn.commit() {
                                Ok(_) => {
                                    committed.fetch_add(1, Ordering::Relaxed);
                                }
                                Err(Error::TransactionConflict { .. }) => {
                                    conflicts.fetch_add(1, Ordering::Relaxed);
                                }
                                Err(err) => panic!("unexpected commit failure: {err}"),
                            }
                        }
                    }
                }
            });
        }
    });

    WorkloadReport {
        direct_ops: direct_ops.load(Ordering::Relaxed),
        committed: committed.load(Ordering::Relaxed),
        conflicts: conflicts.load(Ordering::Relaxed),
    }
}
