//! Aggregate Throughput Benchmark
//!
//! The filtered batch is built once outside the timed loop.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sieve_core::execution::ItemQuery;
use sieve_core::{InputBatch, ItemColumns, StringColumn};

fn uniform_batch(rows: usize) -> InputBatch {
    // Every row passes the AND branch
    InputBatch::new(ItemColumns {
        quantity: vec![6; rows],
        price: (0..rows).map(|i| 10.0 + (i % 7) as f64).collect(),
        discount: (0..rows).map(|i| if i % 2 == 0 { 0.05 } else { 0.07 }).collect(),
        status: StringColumn::from_values(std::iter::repeat_n("A", rows)).expect("status"),
        comment: StringColumn::from_values(std::iter::repeat_n("x", rows)).expect("comment"),
    })
    .expect("uniform batch")
}

fn benchmark_aggregate(c: &mut Criterion) {
    let query = ItemQuery::reference();
    let mut group = c.benchmark_group("aggregate");

    for rows in [1_000, 10_000, 100_000] {
        let filtered = query.filter(&uniform_batch(rows)).expect("filter");
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &filtered, |b, filtered| {
            b.iter(|| black_box(query.aggregate(filtered)))
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_aggregate);
criterion_main!(benches);
