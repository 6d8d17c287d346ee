//! Benchmarks for filtered listing and deep resolution.
//!
//! Run with: cargo bench -p urm-domain

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use urm_domain::{
    DeepMappingFilter, MappingFilter, MappingStore, ResourceType, UserResourceMapping, UserType,
    DEFAULT_NAMESPACE,
};
use urm_storage::MemoryEngine;

const USER: u64 = 1;
const ORGS: u64 = 10;

/// `n` buckets owned directly by the user, plus `n` buckets spread over
/// `ORGS` organizations the user belongs to.
fn setup_store(n: u64) -> MappingStore<MemoryEngine> {
    let store = MappingStore::open(MemoryEngine::new_shared(), DEFAULT_NAMESPACE).unwrap();
    let org_base = 1_000;
    let bucket_base = 1_000_000;

    for org in 0..ORGS {
        store
            .create(&UserResourceMapping::new(
                USER,
                UserType::Member,
                org_base + org,
                ResourceType::Orgs,
            ))
            .unwrap();
    }
    for i in 0..n {
        store
            .create(&UserResourceMapping::new(
                USER,
                UserType::Owner,
                bucket_base + i,
                ResourceType::Buckets,
            ))
            .unwrap();
        store
            .create(&UserResourceMapping::new(
                org_base + i % ORGS,
                UserType::Owner,
                bucket_base + n + i,
                ResourceType::Buckets,
            ))
            .unwrap();
    }
    store
}

fn list_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_by_user");

    for n in [100, 1_000, 10_000] {
        let store = setup_store(n);
        let filter = MappingFilter::new()
            .with_user(USER)
            .with_resource_type(ResourceType::Buckets);

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| store.list(black_box(&filter)).unwrap())
        });
    }

    group.finish();
}

fn deep_resolve_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_deep");

    for n in [100, 1_000, 10_000] {
        let store = setup_store(n);
        let filter = DeepMappingFilter::new(USER, ResourceType::Buckets);

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let (_, count) = store.find_deep(black_box(&filter)).unwrap();
                assert_eq!(count as u64, 2 * n);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, list_benchmark, deep_resolve_benchmark);
criterion_main!(benches);
