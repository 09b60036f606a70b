//! Benchmarks for low-level DSP primitives.

mod compressor;
mod curve;
mod filter;
mod oscillator;

pub use compressor::bench_compressor;
pub use curve::bench_curve;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
