//! Shard-level storage benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ordkv_bench::utils::{random_value, sequential_keys};
use ordkv_storage::Shard;

/// Benchmark raw shard writes.
fn bench_shard_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("shard_put");

    for size in [64, 1024].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let shard = Shard::new();
            let value = random_value(size);
            let mut seq = 0u64;

            b.iter(|| {
                seq += 1;
                shard.apply_put(black_box(seq % 10_000), value.clone(), seq);
            });
        });
    }
    group.finish();
}

/// Benchmark raw shard reads.
fn bench_shard_get(c: &mut Criterion) {
    let shard = Shard::new();
    for key in sequential_keys(100_000) {
        shard.apply_put(key, random_value(64), key + 1);
    }

    let mut key = 0u64;
    c.bench_function("shard_get", |b| {
        b.iter(|| {
            key = (key + 7919) % 100_000;
            let value = shard.get(black_box(key));
            black_box(value);
        });
    });
}

/// Benchmark shard scans.
fn bench_shard_scan(c: &mut Criterion) {
    let shard = Shard::new();
    for key in sequential_keys(100_000) {
        shard.apply_put(key, random_value(64), key + 1);
    }

    let mut group = c.benchmark_group("shard_scan");
    for count in [10usize, 1000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let page = shard.scan(black_box(50_000), count);
                black_box(page);
            });
        });
    }
    group.finish();
}

/// Benchmark snapshot capture as the shard grows.
fn bench_shard_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("shard_snapshot");

    for population in [1_000u64, 100_000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(population),
            population,
            |b, &population| {
                let shard = Shard::new();
                for key in 0..population {
                    shard.apply_put(key, random_value(64), key + 1);
                }

                b.iter(|| {
                    let snap = shard.snapshot();
                    black_box(snap);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_shard_put,
    bench_shard_get,
    bench_shard_scan,
    bench_shard_snapshot
);
criterion_main!(benches);
