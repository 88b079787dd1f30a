//! Benchmark: percentile baseline synthesis and comparison throughput

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use faro::analysis::{build_percentile_baseline, compare, CompareConfig};
use faro::metrics::Metrics;

fn series(len: usize) -> Vec<Metrics> {
    (0..len)
        .map(|i| {
            let wobble = (i % 7) as f64;
            let mut metrics = Metrics::default();
            metrics.scores.performance = Some(0.85 + wobble * 0.01);
            metrics.scores.accessibility = Some(0.9);
            metrics.scores.seo = Some(0.95);
            metrics.core_web_vitals.fcp = Some(1100.0 + wobble * 40.0);
            metrics.core_web_vitals.lcp = Some(2300.0 + wobble * 80.0);
            metrics.core_web_vitals.tbt = Some(180.0 + wobble * 15.0);
            metrics.core_web_vitals.cls = Some(0.03 + wobble * 0.005);
            metrics
        })
        .collect()
}

fn bench_percentile_baseline(c: &mut Criterion) {
    let history = series(100);
    c.bench_function("build_percentile_baseline_100_runs", |b| {
        b.iter(|| build_percentile_baseline(black_box(&history), black_box(75.0)).unwrap())
    });
}

fn bench_compare(c: &mut Criterion) {
    let history = series(100);
    let baseline = build_percentile_baseline(&history, 75.0).unwrap();
    let current = series(1).remove(0);
    let config = CompareConfig::default();
    c.bench_function("compare_against_baseline", |b| {
        b.iter(|| compare(black_box(&current), black_box(&baseline), black_box(&config)))
    });
}

criterion_group!(benches, bench_percentile_baseline, bench_compare);
criterion_main!(benches);
