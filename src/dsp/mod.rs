//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They intentionally stay focused on the
//! signal-processing math so graph combinators can layer on orchestration and
//! modulation.

/// Soft-knee master-bus compressor.
pub mod compressor;
/// Exponential-ramp and set-target automation curves.
pub mod curve;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Block-rate modulation helpers.
pub mod modulate;
/// Oscillator waveforms and noise sources.
pub mod oscillator;
/// Equal-power stereo panning.
pub mod pan;

pub use curve::{Curve, CurveShape};
pub use pan::Pan;
