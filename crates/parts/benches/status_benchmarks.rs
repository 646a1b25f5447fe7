//! Benchmarks for part status classification and aggregation.
//!
//! Run with: cargo bench -p partsapp-parts

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use partsapp_core::RoNumber;
use partsapp_parts::{aggregate, classify, completion_percentage, filter_displayable, PartLine};

fn make_lines(count: usize) -> Vec<PartLine> {
    let ro = RoNumber::new(1).expect("valid ro");
    (0..count)
        .map(|i| {
            let i = i as i64;
            let mut line = PartLine::with_quantities(ro, i, i % 3, i % 4, i % 5, i % 2);
            if i % 11 == 0 {
                line.part_type = "Sublet".to_string();
            }
            line
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify", |b| {
        b.iter(|| classify(black_box(2), black_box(3), black_box(3), black_box(3)))
    });
}

fn bench_vehicle_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("vehicle_summary");
    for size in [10usize, 100, 1_000, 10_000] {
        let lines = make_lines(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| {
                let shown = filter_displayable(lines.clone());
                let counts = aggregate(&shown);
                completion_percentage(&counts)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_vehicle_summary);
criterion_main!(benches);
