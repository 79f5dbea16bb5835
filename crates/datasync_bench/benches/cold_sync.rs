//! Cold sync benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use datasync_bench::{mixed_request, populated_store};
use datasync_core::AllEntities;
use datasync_engine::SyncableDataSet;
use datasync_testkit::SimpleEntity;

/// Benchmark a pass with no operations, reporting the whole scope.
fn bench_scope_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("scope_report");

    for count in [100, 1_000, 10_000] {
        let (store, _) = populated_store(count);
        let data_set: SyncableDataSet<SimpleEntity, _> = SyncableDataSet::from(AllEntities);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let mut txn = store.begin();
                let responses = data_set.cold_sync(&mut txn, Vec::new()).unwrap();
                txn.rollback();
                black_box(responses);
            });
        });
    }

    group.finish();
}

/// Benchmark a pass mixing merges, conflicts, no-ops and inserts.
fn bench_mixed_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_request");

    for count in [100, 1_000, 10_000] {
        let (store, seeded) = populated_store(count);
        let request = mixed_request(&seeded, count / 10);
        let data_set: SyncableDataSet<SimpleEntity, _> = SyncableDataSet::from(AllEntities);

        group.throughput(Throughput::Elements(request.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let mut txn = store.begin();
                let report = data_set.reconcile(&mut txn, request.clone()).unwrap();
                txn.rollback();
                black_box(report);
            });
        });
    }

    group.finish();
}

/// Benchmark a scoped pass selecting a tenth of the store.
fn bench_narrow_scope(c: &mut Criterion) {
    let (store, _) = populated_store(10_000);
    let data_set = SyncableDataSet::from(|e: &SimpleEntity| e.integer % 10 == 0);

    c.bench_function("narrow_scope_10000", |b| {
        b.iter(|| {
            let mut txn = store.begin();
            let responses = data_set.cold_sync(&mut txn, Vec::new()).unwrap();
            txn.rollback();
            black_box(responses);
        });
    });
}

criterion_group!(
    benches,
    bench_scope_report,
    bench_mixed_request,
    bench_narrow_scope
);
criterion_main!(benches);
