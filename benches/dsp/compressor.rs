//! Benchmarks for the master-bus compressor.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use retro_tape::{dsp::compressor::Compressor, CompressorSettings};

use crate::BLOCK_SIZES;

pub fn bench_compressor(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/compressor");

    for &size in BLOCK_SIZES {
        // Loud enough to sit above the knee the whole time
        let input: Vec<f32> = (0..size)
            .map(|i| 0.8 * (i as f32 * 0.05).sin())
            .collect();
        let mut left = input.clone();
        let mut right = input.clone();

        let mut compressor = Compressor::new(CompressorSettings::default());
        group.bench_with_input(BenchmarkId::new("stereo_linked", size), &size, |b, _| {
            b.iter(|| {
                left.copy_from_slice(&input);
                right.copy_from_slice(&input);
                compressor.process(black_box(&mut left), black_box(&mut right), 48_000.0);
            })
        });
    }

    group.finish();
}
