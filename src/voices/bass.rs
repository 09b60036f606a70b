//! Bass voice.
//!
//! # How It Works
//!
//! 1. Sawtooth at the chord root, pitch wobbling with slow tape wow
//! 2. Resonant low-pass (Q = 2) closing from 400 Hz to 200 Hz over 0.3 s,
//!    so each note starts buzzy and rounds off
//! 3. Amplitude starts at 0.3 and falls towards silence with τ = 0.1 s

use rand::Rng;

use crate::{
    error::Result,
    graph::{
        curve::CurveNode,
        extensions::NodeExt,
        filter::{FilterNode, FilterParam},
        oscillator::{OscNode, OscParam},
    },
};

use super::{check_frequency, Voice, VoiceKind, Wobble};

pub const BASS_DURATION: f64 = 0.3;

pub fn bass<R: Rng + ?Sized>(frequency: f32, rng: &mut R) -> Result<Voice> {
    check_frequency(VoiceKind::Bass, frequency)?;
    let wow = Wobble::wow(rng);

    let sweep = FilterNode::lowpass(0.0).with_q(2.0).modulate(
        CurveNode::exponential(400.0, 200.0, BASS_DURATION as f32),
        FilterParam::Cutoff,
        1.0,
    );

    let node = OscNode::sawtooth()
        .with_frequency(frequency)
        .modulate(wow.lfo(), OscParam::Frequency, wow.depth)
        .through(sweep)
        .amplify(CurveNode::target(0.3, 0.0, 0.1));

    Voice::one_shot(VoiceKind::Bass, node.boxed(), BASS_DURATION)
}
