//! Composable building blocks for constructing voices.
//!
//! Graph nodes wrap the low-level DSP primitives with what a voice needs:
//! start events, modulation, and block-based rendering. The `extensions`
//! module adds fluent helpers so voices read as a chain.

/// Multiply two signals together, or scale by a constant.
pub mod amplify;
/// One-shot automation curves as signals.
pub mod curve;
/// Fluent combinators (`.amplify()`, `.mix()`, etc.).
pub mod extensions;
/// Topology-preserving filter node with multiple responses.
pub mod filter;
/// Low frequency oscillators for parameter modulation.
pub mod lfo;
/// Linear wet/dry mixing for parallel graphs.
pub mod mix;
/// Connect modulation sources to node parameters.
pub mod modulate;
/// Core traits shared by all graph nodes.
pub mod node;
/// Looped pre-rendered noise.
pub mod noise_loop;
/// Audio-band oscillators and noise sources.
pub mod oscillator;
/// Serial chaining of two nodes (source → effect).
pub mod through;
