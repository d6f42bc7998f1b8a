//! Benchmarks for index maintenance overhead.
//!
//! Run with: cargo bench
//!
//! Compares an IndexedList with two indices against a plain Vec scan.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nexus_indexed::IndexedList;

const LEN: usize = 10_000;
const GROUPS: u32 = 64;

#[derive(Clone, PartialEq)]
struct Order {
    id: u64,
    group: u32,
    price: u64,
}

fn order(i: usize) -> Order {
    Order {
        id: i as u64,
        group: i as u32 % GROUPS,
        price: 100 + (i as u64 % 17),
    }
}

fn indexed() -> IndexedList<Order> {
    IndexedList::builder()
        .with_capacity(LEN)
        .index("group", |o: &Order| o.group)
        .index("price", |o: &Order| o.price)
        .build()
        .unwrap()
}

// ============================================================================
// Push
// ============================================================================

fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("push");
    group.throughput(Throughput::Elements(LEN as u64));

    group.bench_function("indexed_list", |b| {
        let mut list = indexed();
        b.iter(|| {
            for i in 0..LEN {
                list.push(black_box(order(i)));
            }
            list.clear();
        });
    });

    group.bench_function("vec", |b| {
        let mut vec = Vec::with_capacity(LEN);
        b.iter(|| {
            for i in 0..LEN {
                vec.push(black_box(order(i)));
            }
            vec.clear();
        });
    });

    group.finish();
}

// ============================================================================
// Lookup
// ============================================================================

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    let mut list = indexed();
    list.extend((0..LEN).map(order));
    let vec: Vec<_> = (0..LEN).map(order).collect();

    for key in [0u32, GROUPS / 2] {
        group.bench_with_input(BenchmarkId::new("indexed_list", key), &key, |b, key| {
            b.iter(|| list.lookup_by("group", key).unwrap().map(|o| o.id).sum::<u64>());
        });
        group.bench_with_input(BenchmarkId::new("vec_scan", key), &key, |b, key| {
            b.iter(|| {
                vec.iter()
                    .filter(|o| o.group == *key)
                    .map(|o| o.id)
                    .sum::<u64>()
            });
        });
    }

    group.finish();
}

// ============================================================================
// Remove
// ============================================================================

fn bench_remove_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_at");
    group.throughput(Throughput::Elements(LEN as u64));

    let mut list = indexed();
    group.bench_function("indexed_list_back", |b| {
        b.iter(|| {
            list.extend((0..LEN).map(order));
            while let Ok(o) = list.remove_at(list.len().wrapping_sub(1)) {
                black_box(o.price);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_push, bench_lookup, bench_remove_at);
criterion_main!(benches);
