//! Scenario benchmarks.
//!
//! These model what the loop actually renders: whole voices from their
//! onset, and the mixer with a dense beat in flight.

mod mixer;
mod voices;

pub use mixer::bench_mixer;
pub use voices::bench_voices;
