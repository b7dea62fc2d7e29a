//! # Message-Reconciliation Benchmarks
//!
//! | Area | Operation | Expectation |
//! |------|-----------|-------------|
//! | mr-01 Bloom Filter | insert / may_contain | O(k) per item |
//! | mr-01 Bloom Filter | hex wire decode | linear in filter size |
//! | mr-03 Reconciliation | FilterOut | linear in store size |
//! | mr-03 Reconciliation | FilterComplement | linear in candidate count |

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use mr_01_bloom_filter::BloomFilter;
use mr_02_message_store::InMemoryMessageStore;
use mr_03_reconciliation::{ReconciliationApi, ReconciliationService, ServerFilterConfig};
use mr_04_api_gateway::{BloomEncoding, LimitsConfig};

fn ids(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}-{:08}", prefix, i)).collect()
}

// ============================================================================
// MR-01: Bloom Filter
// ============================================================================

fn bench_filter_insert_and_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("mr-01-bloom-filter");
    let items = ids("item", 10_000);

    for k in [3usize, 7, 14] {
        group.throughput(Throughput::Elements(items.len() as u64));

        group.bench_with_input(BenchmarkId::new("insert", k), &k, |b, &k| {
            b.iter(|| {
                let mut filter = BloomFilter::new(131_072, k).unwrap();
                for item in &items {
                    filter.insert(item);
                }
                black_box(filter)
            })
        });

        let mut filter = BloomFilter::new(131_072, k).unwrap();
        for item in &items {
            filter.insert(item);
        }
        group.bench_with_input(BenchmarkId::new("may_contain", k), &k, |b, _| {
            b.iter(|| {
                items
                    .iter()
                    .filter(|item| filter.may_contain(black_box(item.as_str())))
                    .count()
            })
        });
    }

    group.finish();
}

fn bench_wire_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("mr-01-wire-decode");
    let limits = LimitsConfig::default();

    for expected in [1_000usize, 100_000] {
        let mut filter = BloomFilter::with_capacity(expected, 0.01).unwrap();
        for item in ids("wire", expected) {
            filter.insert(&item);
        }
        let encoded = BloomEncoding::from_filter(&filter);

        group.throughput(Throughput::Bytes(filter.as_bytes().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(expected), &encoded, |b, encoded| {
            b.iter(|| black_box(encoded.decode(&limits).unwrap()))
        });
    }

    group.finish();
}

// ============================================================================
// MR-03: Reconciliation
// ============================================================================

fn bench_filter_out_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("mr-03-filter-out");

    for size in [1_000usize, 10_000, 100_000] {
        let config = ServerFilterConfig::default().with_expected_messages(size);
        let service =
            ReconciliationService::new(Arc::new(InMemoryMessageStore::new()), &config).unwrap();
        let stored = ids("msg", size);
        service.publish(&stored).unwrap();

        // Requester already holds half of the store
        let mut filter = BloomFilter::with_capacity(size / 2, 0.01).unwrap();
        for id in stored.iter().step_by(2) {
            filter.insert(id);
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &filter, |b, filter| {
            b.iter(|| black_box(service.filter_out(filter).unwrap()))
        });
    }

    group.finish();
}

fn bench_filter_complement(c: &mut Criterion) {
    let mut group = c.benchmark_group("mr-03-filter-complement");

    let service =
        ReconciliationService::with_defaults(Arc::new(InMemoryMessageStore::new())).unwrap();
    service.publish(&ids("known", 50_000)).unwrap();

    for count in [100usize, 1_000, 10_000] {
        let mut candidates = ids("known", count / 2);
        candidates.extend(ids("novel", count / 2));

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &candidates,
            |b, candidates| b.iter(|| black_box(service.filter_complement(candidates).unwrap())),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_filter_insert_and_lookup,
    bench_wire_decode,
    bench_filter_out_scan,
    bench_filter_complement,
);
criterion_main!(benches);
