//! Criterion benchmarks for `adpost-report`.
//!
//! Curve sampling and SVG rasterization dominate section rendering.

use adpost_common::Metric;
use adpost_math::PosteriorParams;
use adpost_report::{rasterize, render_curve, AxisLabels, PlotStyle};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_render_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_curve");

    let cases = [
        ("ctr_beta", PosteriorParams::beta(93.0, 909.0).unwrap()),
        ("cpa_inverse_gamma", PosteriorParams::inverse_gamma(14.0, 1300.0).unwrap()),
        ("roas_gamma", PosteriorParams::gamma(14.0, 0.1538).unwrap()),
    ];
    for (name, params) in &cases {
        for n in [100usize, 300, 1_000] {
            group.bench_with_input(BenchmarkId::new(*name, n), &n, |b, &n| {
                b.iter(|| black_box(render_curve(black_box(params), n)))
            });
        }
    }

    group.finish();
}

fn bench_rasterize(c: &mut Criterion) {
    let params = PosteriorParams::beta(93.0, 909.0).unwrap();
    let curve = render_curve(&params, 300).unwrap();
    let labels = AxisLabels::for_metric(Metric::Ctr);
    let style = PlotStyle::default();
    c.bench_function("rasterize_300", |b| {
        b.iter(|| black_box(rasterize(black_box(&curve), "CTR Posterior for Ad A", &labels, &style)))
    });
}

criterion_group!(benches, bench_render_curve, bench_rasterize);
criterion_main!(benches);
