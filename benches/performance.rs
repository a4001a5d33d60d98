//! Performance benchmarks for delay generation and summary statistics

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use variable_reflector::{
    server::echo_body,
    stats::LatencySummary,
    DelayGenerator, DistributionShape, LatencyConfig,
};

fn benchmark_delay_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("delay_generation");

    for shape in DistributionShape::ALL {
        let config = LatencyConfig::new(0.05, 2.0, shape).unwrap();

        let thread_rng = DelayGenerator::with_thread_rng(config);
        group.bench_with_input(BenchmarkId::new("thread_rng", shape.name()), &thread_rng, |b, generator| {
            b.iter(|| black_box(generator.generate()))
        });

        // Seeded generation goes through a mutex
        let seeded = DelayGenerator::seeded(config, 42);
        group.bench_with_input(BenchmarkId::new("seeded", shape.name()), &seeded, |b, generator| {
            b.iter(|| black_box(generator.generate()))
        });
    }

    group.finish();
}

fn benchmark_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("latency_summary");
    let generator = DelayGenerator::seeded(LatencyConfig::new(0.0, 10.0, DistributionShape::RightSkewed).unwrap(), 7);

    for size in [100usize, 1_000, 10_000] {
        let samples: Vec<f64> = (0..size).map(|_| generator.generate().seconds()).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &samples, |b, samples| {
            b.iter(|| LatencySummary::from_samples(black_box(samples)))
        });
    }

    group.finish();
}

fn benchmark_echo_body(c: &mut Criterion) {
    let body = serde_json::to_vec(&serde_json::json!({
        "id": 42,
        "items": (0..50).map(|i| serde_json::json!({"sku": format!("item-{}", i), "qty": i})).collect::<Vec<_>>(),
    }))
    .unwrap();

    c.bench_function("echo_body_json", |b| {
        b.iter(|| echo_body(black_box("/orders?id=42"), black_box(&body)))
    });
    c.bench_function("echo_body_empty", |b| {
        b.iter(|| echo_body(black_box("/health?id=1"), black_box(b"")))
    });
}

criterion_group!(benches, benchmark_delay_generation, benchmark_summary, benchmark_echo_body);
criterion_main!(benches);
