//! Benchmarks for contingency building, association scoring, and mosaic
//! layout over a synthetic categorical dataset.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use crosstab_engine::{
    build_contingency, layout_mosaic, layout_sieve, score_association, LayoutOptions, Rect,
};
use dataset::{Attribute, Dataset, Schema};

const RECORDS: usize = 100_000;

/// Deterministic dataset: four categorical attributes with cardinalities
/// 4 / 3 / 5 / 2 plus a class column, values cycling at co-prime strides
/// so every combination occurs.
fn create_bench_dataset() -> Dataset {
    let schema = Schema::with_class(
        vec![
            Attribute::categorical("region", ["north", "south", "east", "west"]),
            Attribute::categorical("size", ["small", "medium", "large"]),
            Attribute::categorical("grade", ["a", "b", "c", "d", "e"]),
            Attribute::categorical("active", ["no", "yes"]),
            Attribute::categorical("outcome", ["fail", "pass"]),
        ],
        "outcome",
    )
    .unwrap();

    let regions = ["north", "south", "east", "west"];
    let sizes = ["small", "medium", "large"];
    let grades = ["a", "b", "c", "d", "e"];
    let actives = ["no", "yes"];
    let outcomes = ["fail", "pass"];

    let mut data = Dataset::new(schema);
    data.reserve(RECORDS);
    for i in 0..RECORDS {
        data.push_record(&[
            Some(regions[i % 4]),
            Some(sizes[(i * 7) % 3]),
            Some(grades[(i * 11) % 5]),
            Some(actives[(i * 13) % 2]),
            Some(outcomes[(i * 17) % 2]),
        ])
        .expect("bench record conforms to schema");
    }
    data
}

fn bench_build_contingency(c: &mut Criterion) {
    let data = create_bench_dataset();
    c.bench_function("build_contingency_2way_100k", |b| {
        b.iter(|| build_contingency(black_box(&data), &["region", "grade"], None))
    });
    c.bench_function("build_contingency_4way_100k", |b| {
        b.iter(|| build_contingency(black_box(&data), &["region", "size", "grade", "active"], None))
    });
}

fn bench_score_association(c: &mut Criterion) {
    let data = create_bench_dataset();
    let table = build_contingency(&data, &["region", "grade"], None).expect("valid attributes");
    c.bench_function("score_association_4x5", |b| {
        b.iter(|| score_association(black_box(&table)))
    });
}

fn bench_layouts(c: &mut Criterion) {
    let data = create_bench_dataset();
    let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
    let options = LayoutOptions::default();

    c.bench_function("layout_mosaic_3way_100k", |b| {
        b.iter(|| {
            layout_mosaic(
                black_box(&data),
                &["region", "size", "active"],
                bounds,
                &options,
                None,
            )
        })
    });
    c.bench_function("layout_sieve_100k", |b| {
        b.iter(|| layout_sieve(black_box(&data), "region", "grade", bounds, None))
    });
}

criterion_group!(
    benches,
    bench_build_contingency,
    bench_score_association,
    bench_layouts
);
criterion_main!(benches);
