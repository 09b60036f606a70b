//! Benchmarks for the state-variable filter at the settings the voices use.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use retro_tape::dsp::filter::SVFilter;
use retro_tape::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::from_freq(48_000.0, 65.41, 1.0);

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let mut buffer = input.clone();

        let mut bass = SVFilter::lowpass(400.0);
        bass.set_q(2.0);
        let cases = [
            ("lowpass_bass_q2", bass),
            ("highpass_snare", SVFilter::highpass(1_000.0)),
            ("highpass_hihat", SVFilter::highpass(6_000.0)),
            ("lowpass_noise_floor", SVFilter::lowpass(800.0)),
        ];

        for (name, mut filter) in cases {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), black_box(&ctx));
                })
            });
        }
    }

    group.finish();
}
