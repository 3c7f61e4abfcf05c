//! Performance benchmarks for relation ordering and field codecs
//!
//! Run with: `cargo bench -p cmsdb-core`
//!
//! These benchmarks measure the hot paths of a relation update:
//! - Connect batches against a large existing bucket
//! - Order map computation with many tied rows
//! - Field codec conversion of a typical row

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cmsdb_core::fields;
use cmsdb_core::models::{Attribute, ConnectInstruction, FieldValue, RelationRow};
use cmsdb_core::RelationsOrderer;

/// Bucket of `size` rows with integer orders
fn bucket(size: i64) -> Vec<RelationRow> {
    (1..=size).map(|id| RelationRow::new(id, id as f64)).collect()
}

/// Batch mixing every placement kind, including forward references
fn mixed_batch(bucket_size: i64, count: i64) -> Vec<ConnectInstruction> {
    let first_new = bucket_size + 1;
    (0..count)
        .map(|i| {
            let id = first_new + i;
            match i % 4 {
                0 => ConnectInstruction::start(id),
                1 => ConnectInstruction::after(id, (i % bucket_size) + 1),
                // Anchored on the next new row, resolved by the pre-sort
                2 if i + 1 < count => ConnectInstruction::before(id, id + 1),
                _ => ConnectInstruction::end(id),
            }
        })
        .collect()
}

fn bench_connect(c: &mut Criterion) {
    let mut group = c.benchmark_group("connect");

    for size in [100_i64, 1_000, 10_000] {
        let orderer = RelationsOrderer::new(bucket(size));
        let batch = mixed_batch(size, 50);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| orderer.connect(black_box(&batch)).unwrap());
        });
    }

    group.finish();
}

fn bench_order_map(c: &mut Criterion) {
    // Every new row lands in the same slot, the worst case for spreading
    let orderer = RelationsOrderer::new(bucket(1_000))
        .connect(
            &(0..200)
                .map(|i| ConnectInstruction::end(10_000 + i))
                .collect::<Vec<_>>(),
        )
        .unwrap();

    c.bench_function("get_order_map_200_tied", |b| {
        b.iter(|| black_box(orderer.get_order_map()));
    });
}

fn bench_codecs(c: &mut Criterion) {
    let row = [
        (Attribute::new("string"), FieldValue::from("Hello world")),
        (Attribute::new("integer"), FieldValue::from("42")),
        (Attribute::new("boolean"), FieldValue::Bool(true)),
        (Attribute::new("datetime"), FieldValue::from("2024-03-01T10:00:00.000Z")),
        (Attribute::new("time"), FieldValue::from("14:30")),
        (
            Attribute::new("json"),
            FieldValue::Json(serde_json::json!({ "tags": ["a", "b"], "views": 10 })),
        ),
    ];

    c.bench_function("to_db_row", |b| {
        b.iter(|| {
            for (attribute, value) in &row {
                black_box(fields::to_db(attribute, value).unwrap());
            }
        });
    });
}

criterion_group!(benches, bench_connect, bench_order_map, bench_codecs);
criterion_main!(benches);
