//! Benchmarks for the voice chains the loop schedules.
//!
//! Each voice is built fresh outside the timed section and rendered from
//! its onset, where every envelope and sweep is still moving.

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion};
use rand::{rngs::SmallRng, SeedableRng};
use retro_tape::{
    graph::node::RenderCtx,
    voices::{self, Voice},
    Result,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn onset(voice: Result<Voice>, ctx: &RenderCtx) -> Voice {
    let mut voice = voice.expect("voice parameters are fixed");
    voice.node_mut().note_on(ctx);
    voice
}

type Build = fn(&mut SmallRng) -> Result<Voice>;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let ctx = RenderCtx::from_freq(SAMPLE_RATE, 0.0, 1.0);
    let mut rng = SmallRng::seed_from_u64(11);

    let cases: [(&str, Build); 6] = [
        ("kick", |_| voices::kick()),
        ("snare", |rng| voices::snare(rng)),
        ("hihat", |rng| voices::hihat(rng)),
        ("bass_wow", |rng| voices::bass(65.41, rng)),
        ("chord_note_flutter", |rng| voices::chord_note(0, 261.63, rng)),
        ("noise_floor", |rng| voices::noise_floor(SAMPLE_RATE, 0.05, rng)),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, build) in cases {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter_batched(
                    || onset(build(&mut rng), &ctx),
                    |mut voice| {
                        voice
                            .node_mut()
                            .render_block(black_box(&mut buffer), black_box(&ctx));
                        voice
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}
