//! Performance benchmarks for the pure quoting path
//!
//! Run with: `cargo bench`
//! View results: `open target/criterion/report/index.html`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use order_engine::oms::{DepthSnapshot, OrderDraft, PreviewBuilder, Validator};
use order_engine::{Money, Side};

fn benchmark_validate(c: &mut Criterion) {
    let validator = Validator::default();
    let draft = OrderDraft::stop_limit(
        "BTC-YES",
        Side::Buy,
        Money::from_i64(100),
        Money::from_f64(0.64),
        Money::from_f64(0.65),
    );
    c.bench_function("validate_stop_limit", |b| b.iter(|| validator.validate(black_box(&draft))));
}

fn benchmark_preview(c: &mut Criterion) {
    let builder = PreviewBuilder::default();
    let draft = OrderDraft::limit("BTC-YES", Side::Buy, Money::from_i64(100), Money::from_f64(0.65));
    let reference = Money::from_f64(0.65);
    let liquidity = Money::from_i64(10_000);

    c.bench_function("compute_fees", |b| {
        b.iter(|| builder.fee_engine().compute_fees(black_box(&draft), reference))
    });
    c.bench_function("build_preview", |b| {
        b.iter(|| builder.build_preview(black_box(&draft), reference, liquidity))
    });
}

fn benchmark_depth(c: &mut Criterion) {
    let bids: Vec<(Money, Money)> = (1..=50)
        .map(|i| (Money::from_f64(0.65 - i as f64 * 0.001), Money::from_i64(100 + i)))
        .collect();
    let asks: Vec<(Money, Money)> = (1..=50)
        .map(|i| (Money::from_f64(0.65 + i as f64 * 0.001), Money::from_i64(100 + i)))
        .collect();

    c.bench_function("depth_snapshot_50x50", |b| {
        b.iter(|| DepthSnapshot::from_levels(1, black_box(&bids), black_box(&asks)))
    });
}

criterion_group!(benches, benchmark_validate, benchmark_preview, benchmark_depth);
criterion_main!(benches);
