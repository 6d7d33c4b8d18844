//! Benchmark for TreeMap vs standard BTreeMap.
//!
//! Keys are scattered with a multiplicative hash so that the unbalanced tree
//! stays shallow; sorted insertion would measure a linked list instead.

use bstmap::tree::TreeMap;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::collections::BTreeMap;

fn scattered_keys(size: u32) -> Vec<u32> {
    (0..size)
        .map(|index| index.wrapping_mul(2_654_435_761) % (size * 16))
        .collect()
}

// =============================================================================
// add Benchmark
// =============================================================================

fn benchmark_add(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("add");

    for size in [100, 1000, 10000] {
        let keys = scattered_keys(size);

        // TreeMap add
        group.bench_with_input(BenchmarkId::new("TreeMap", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut map = TreeMap::new();
                for &key in keys {
                    map.add(black_box(key), black_box(key * 2));
                }
                black_box(map)
            });
        });

        // Standard BTreeMap insert
        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut map = BTreeMap::new();
                for &key in keys {
                    map.insert(black_box(key), black_box(key * 2));
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in [100, 1000, 10000] {
        let keys = scattered_keys(size);
        let tree_map: TreeMap<u32, u32> = keys.iter().map(|&key| (key, key * 2)).collect();
        let standard_map: BTreeMap<u32, u32> = keys.iter().map(|&key| (key, key * 2)).collect();

        // TreeMap get
        group.bench_with_input(BenchmarkId::new("TreeMap", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut sum = 0u64;
                for key in keys {
                    if let Some(&value) = tree_map.get(black_box(key)) {
                        sum += u64::from(value);
                    }
                }
                black_box(sum)
            });
        });

        // Standard BTreeMap get
        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut sum = 0u64;
                for key in keys {
                    if let Some(&value) = standard_map.get(black_box(key)) {
                        sum += u64::from(value);
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// remove Benchmark
// =============================================================================

fn benchmark_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("remove");

    for size in [100, 1000, 10000] {
        let keys = scattered_keys(size);
        let tree_map: TreeMap<u32, u32> = keys.iter().map(|&key| (key, key * 2)).collect();
        let standard_map: BTreeMap<u32, u32> = keys.iter().map(|&key| (key, key * 2)).collect();

        // TreeMap remove
        group.bench_with_input(BenchmarkId::new("TreeMap", size), &keys, |bencher, keys| {
            bencher.iter_batched(
                || tree_map.clone(),
                |mut map| {
                    for key in keys {
                        black_box(map.remove(black_box(key)));
                    }
                    map
                },
                criterion::BatchSize::SmallInput,
            );
        });

        // Standard BTreeMap remove
        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |bencher, keys| {
            bencher.iter_batched(
                || standard_map.clone(),
                |mut map| {
                    for key in keys {
                        black_box(map.remove(black_box(key)));
                    }
                    map
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// iteration Benchmark
// =============================================================================

fn benchmark_iteration(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iteration");

    for size in [100, 1000, 10000] {
        let keys = scattered_keys(size);
        let tree_map: TreeMap<u32, u32> = keys.iter().map(|&key| (key, key * 2)).collect();
        let standard_map: BTreeMap<u32, u32> = keys.iter().map(|&key| (key, key * 2)).collect();

        // TreeMap iter
        group.bench_with_input(BenchmarkId::new("TreeMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: u64 = tree_map.values().map(|&value| u64::from(value)).sum();
                black_box(sum)
            });
        });

        // TreeMap fail-fast cursor
        group.bench_with_input(
            BenchmarkId::new("TreeMap/entries", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let mut sum = 0u64;
                    let mut entries = tree_map.entries();
                    while entries.has_next() {
                        if let Ok(entry) = entries.next_entry(&tree_map) {
                            sum += u64::from(*entry.value());
                        }
                    }
                    black_box(sum)
                });
            },
        );

        // Standard BTreeMap iter
        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: u64 = standard_map.values().map(|&value| u64::from(value)).sum();
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Group and Main
// =============================================================================

criterion_group!(
    benches,
    benchmark_add,
    benchmark_get,
    benchmark_remove,
    benchmark_iteration
);

criterion_main!(benches);
