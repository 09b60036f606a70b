//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use retro_tape::dsp::oscillator::OscillatorBlock;
use retro_tape::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let ctx = RenderCtx::from_freq(48_000.0, 261.63, 1.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let cases = [
            ("sine", OscillatorBlock::sine()),         // chord notes, kick
            ("sawtooth", OscillatorBlock::sawtooth()), // bass
            ("triangle", OscillatorBlock::triangle()), // chord notes, snare body
            ("noise", OscillatorBlock::noise().with_seed(7)),
        ];

        for (name, mut osc) in cases {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    osc.render(black_box(&mut buffer), black_box(&ctx));
                })
            });
        }
    }

    group.finish();
}
