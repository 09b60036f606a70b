//! Benchmarks for automation curves.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use retro_tape::dsp::curve::Curve;
use retro_tape::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/curve");
    let ctx = RenderCtx::from_freq(48_000.0, 440.0, 1.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Restarted every iteration so the ramp is always mid-flight
        let mut ramp = Curve::exponential(0.8, 0.01, 0.5);
        group.bench_with_input(BenchmarkId::new("exponential", size), &size, |b, _| {
            b.iter(|| {
                ramp.reset();
                ramp.render(black_box(&mut buffer), black_box(&ctx));
            })
        });

        let mut target = Curve::target(0.3, 0.0, 0.1);
        group.bench_with_input(BenchmarkId::new("target", size), &size, |b, _| {
            b.iter(|| {
                target.reset();
                target.render(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
