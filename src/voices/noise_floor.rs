//! Continuous tape hiss under the whole loop.

use rand::Rng;

use crate::{
    error::{Result, RetroError},
    graph::{extensions::NodeExt, filter::FilterNode, noise_loop::NoiseLoop},
};

use super::{Voice, VoiceKind};

pub const NOISE_LOOP_SECONDS: f32 = 2.0;

/// Two seconds of looped noise, low-passed at 800 Hz, at a fixed level.
pub fn noise_floor<R: Rng + ?Sized>(sample_rate: f32, gain: f32, rng: &mut R) -> Result<Voice> {
    if !gain.is_finite() || gain < 0.0 {
        return Err(RetroError::InvalidVoice(format!(
            "noise floor gain must be non-negative, got {gain}"
        )));
    }

    let node = NoiseLoop::new(NOISE_LOOP_SECONDS, sample_rate, rng.gen())
        .through(FilterNode::lowpass(800.0))
        .gain(gain);

    Voice::continuous(VoiceKind::NoiseFloor, node.boxed())
}
