//! Wall-clock benchmarks for the core heap operations
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench heap_bench
//!
//! # Only the decrease-key workloads
//! cargo bench --bench heap_bench -- 'decrease_key'
//! ```

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rust_fibonacci_heap::fibonacci::FibonacciHeap;
use std::hint::black_box;

const SIZES: [usize; 3] = [1 << 10, 1 << 14, 1 << 17];

/// Deterministic pseudo-random keys (xorshift), so runs are comparable.
fn keys(n: usize, seed: u64) -> Vec<i64> {
    let mut state = seed | 1;
    (0..n)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 16) as i64
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &SIZES {
        let input = keys(n, 0x9e37_79b9);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| {
                let mut heap = FibonacciHeap::new();
                for &k in input {
                    heap.insert_key(k);
                }
                black_box(heap.len())
            })
        });
    }
    group.finish();
}

fn bench_delete_min(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete_min");
    group.sample_size(20);
    for &n in &SIZES {
        let input = keys(n, 0x85eb_ca6b);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter_batched(
                || input.iter().map(|&k| (k, ())).collect::<FibonacciHeap>(),
                |mut heap| {
                    while let Ok((key, ())) = heap.delete_min() {
                        black_box(key);
                    }
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_decrease_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("decrease_key");
    group.sample_size(20);
    for &n in &SIZES {
        let input = keys(n, 0xc2b2_ae35);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter_batched(
                || {
                    let mut heap = FibonacciHeap::new();
                    let handles: Vec<_> = input.iter().map(|&k| heap.insert_key(k)).collect();
                    // Consolidate once so decreases have trees to cut from.
                    heap.insert_key(i64::MIN);
                    let _ = heap.delete_min();
                    (heap, handles)
                },
                |(mut heap, handles)| {
                    for (i, h) in handles.iter().enumerate() {
                        let _ = heap.decrease_key_by(h, (i % 1024) as i64 + 1);
                    }
                    black_box(heap.stats())
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_meld(c: &mut Criterion) {
    let mut group = c.benchmark_group("meld");
    for &n in &SIZES {
        let left = keys(n, 0x27d4_eb2f);
        let right = keys(n, 0x1656_67b1);
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(left, right),
            |b, (left, right)| {
                b.iter_batched(
                    || {
                        let a: FibonacciHeap = left.iter().map(|&k| (k, ())).collect();
                        let b: FibonacciHeap = right.iter().map(|&k| (k, ())).collect();
                        (a, b)
                    },
                    |(mut a, b)| {
                        a.meld(b);
                        black_box(a.min_key());
                        a
                    },
                    BatchSize::LargeInput,
                )
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_delete_min,
    bench_decrease_key,
    bench_meld
);
criterion_main!(benches);
