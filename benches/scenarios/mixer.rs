//! Benchmarks for the mixer with a full beat sounding.
//!
//! A beat on the downbeat of bar one is the densest moment in the loop:
//! kick, two hats, two bass notes and a three-note chord on top of the
//! noise floor, all through the master compressor.

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion};
use rand::{rngs::SmallRng, SeedableRng};
use retro_tape::{
    engine::{
        context::{AudioContext, ContextFactory},
        offline::{OfflineFactory, OfflineRenderer},
    },
    pattern::generate_beat_event,
    synth, CompressorSettings, RetroConfig,
};

use crate::BLOCK_SIZES;

fn busy_beat(rng: &mut SmallRng) -> (Box<dyn AudioContext>, OfflineRenderer) {
    let config = RetroConfig::default();
    let mut factory = OfflineFactory::new(48_000.0);
    let mut context = factory.open().expect("offline context");
    let renderer = factory.renderer().expect("renderer for open context");

    context
        .install_compressor(CompressorSettings::default())
        .expect("open context");
    synth::start_noise_floor(context.as_mut(), config.noise_floor_gain, rng).expect("noise floor");
    let event = generate_beat_event(0, config.seconds_per_beat(), config.syncopation, rng);
    synth::play_beat(context.as_mut(), 0.0, &event, rng);

    (context, renderer)
}

pub fn bench_mixer(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mixer");
    let mut rng = SmallRng::seed_from_u64(5);

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("full_beat", size), &size, |b, _| {
            b.iter_batched(
                || busy_beat(&mut rng),
                |(context, renderer)| {
                    renderer.render(black_box(&mut left), black_box(&mut right));
                    context
                },
                BatchSize::SmallInput,
            )
        });

        let mut interleaved = vec![0.0f32; size * 2];
        group.bench_with_input(BenchmarkId::new("full_beat_interleaved", size), &size, |b, _| {
            b.iter_batched(
                || busy_beat(&mut rng),
                |(context, renderer)| {
                    renderer.render_interleaved(black_box(&mut interleaved));
                    context
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}
