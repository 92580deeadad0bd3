//! Benchmarks for result normalization.
//!
//! Run with: cargo bench --package edr-client
//! Or: cargo bench --package edr-client --bench normalize_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use edr_client::normalize::{canonical_string, canonicalize, Record};
use edr_client::{group_by_collection, group_by_layer, unique_by};
use edr_protocol::{EdrResponse, Feature, Location};
use serde_json::json;
use test_utils::{feature_collection, location_feature};

fn features(n: usize, distinct: usize) -> Vec<Feature> {
    (0..n)
        .map(|i| {
            Feature::point(i as f64 * 0.01, 50.0)
                .with_id(i as i64)
                .with_property("station", format!("S{}", i % distinct))
        })
        .collect()
}

fn locations(n: usize) -> Vec<Location> {
    (0..n)
        .map(|i| Location::new(i as i64, format!("collection-{}", i % 8)).with_layer(format!("layer-{}", i % 3)))
        .collect()
}

// =============================================================================
// DEDUPLICATION BENCHMARKS
// =============================================================================

fn bench_unique_by(c: &mut Criterion) {
    let mut group = c.benchmark_group("unique_by");

    for size in [100, 1_000, 10_000] {
        let input = features(size, size / 4);
        group.bench_with_input(BenchmarkId::new("string_property", size), &input, |b, input| {
            b.iter(|| unique_by(black_box(input), "station"))
        });
    }

    // Composite values take the linear path.
    let composite: Vec<Feature> = (0..500)
        .map(|i| Feature::point(0.0, 0.0).with_property("pos", json!([i % 50, i % 7])))
        .collect();
    group.bench_function("array_property_500", |b| {
        b.iter(|| unique_by(black_box(&composite), "pos"))
    });

    group.finish();
}

// =============================================================================
// GROUPING BENCHMARKS
// =============================================================================

fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping");
    let input = locations(10_000);

    group.bench_function("by_collection_10k", |b| {
        b.iter(|| group_by_collection(black_box(&input)))
    });
    group.bench_function("by_layer_10k", |b| b.iter(|| group_by_layer(black_box(&input))));

    group.finish();
}

// =============================================================================
// CANONICALIZATION BENCHMARKS
// =============================================================================

fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonicalize");

    let record: Record = (0..32)
        .rev()
        .map(|i| (format!("key-{:02}", i), json!(i)))
        .collect();

    group.bench_function("record_32_keys", |b| b.iter(|| canonicalize(black_box(Some(&record)))));
    group.bench_function("canonical_string_32_keys", |b| {
        b.iter(|| canonical_string(black_box(&record)))
    });

    group.finish();
}

// =============================================================================
// DISCRIMINATION BENCHMARKS
// =============================================================================

fn bench_discriminate(c: &mut Criterion) {
    let page = feature_collection(
        (0..1_000)
            .map(|i| location_feature(i, &format!("Station {}", i), 0.0, 0.0))
            .collect(),
        Some("https://edr.example/api/collections/c/locations?page=2"),
    );

    c.bench_function("from_value_feature_page_1k", |b| {
        b.iter(|| EdrResponse::from_value(black_box(page.clone())))
    });
}

criterion_group!(
    benches,
    bench_unique_by,
    bench_grouping,
    bench_canonicalize,
    bench_discriminate,
);
criterion_main!(benches);
