use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mvcc::mvcc::{Database, Isolation};

fn bench_set_get_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_get_roundtrip");

    for isolation in
        [Isolation::ReadUncommitted, Isolation::ReadCommitted, Isolation::RepeatableRead, Isolation::Snapshot, Isolation::Serializable]
    {
        group.bench_with_input(BenchmarkId::from_parameter(isolation), &isolation, |b, &isolation| {
            let mut db = Database::new(isolation);
            let txn = db.begin(None);
            b.iter(|| {
                db.set(txn, "k", black_box("v".to_string()));
                black_box(db.get(txn, "k").unwrap());
            });
        });
    }

    group.finish();
}

fn bench_commit_with_growing_version_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit_with_growing_version_chain");

    for versions in [1usize, 16, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(versions), &versions, |b, &versions| {
            b.iter(|| {
                let mut db = Database::new(Isolation::Snapshot);
                let writer = db.begin(None);
                for i in 0..versions {
                    db.set(writer, "k", i.to_string());
                }
                db.commit(writer).unwrap();

                let reader = db.begin(None);
                black_box(db.get(reader, "k").unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_set_get_roundtrip, bench_commit_with_growing_version_chain);
criterion_main!(benches);
