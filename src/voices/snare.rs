//! Snare drum voice.
//!
//! Two layers struck together:
//!
//! - rattle: white noise, high-passed at 1 kHz, 0.4 → 0.01 over 0.2 s
//! - body:   200 Hz triangle blip, 0.2 → 0.01 over 0.1 s
//!
//! The blend is an equal linear mix scaled back up, so each layer keeps its
//! own level.

use rand::Rng;

use crate::{
    error::Result,
    graph::{curve::CurveNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode},
};

use super::{Voice, VoiceKind};

pub const SNARE_DURATION: f64 = 0.2;

pub fn snare<R: Rng + ?Sized>(rng: &mut R) -> Result<Voice> {
    let rattle = OscNode::noise()
        .with_seed(rng.gen())
        .through(FilterNode::highpass(1_000.0))
        .amplify(CurveNode::exponential(0.4, 0.01, 0.2));

    let body = OscNode::triangle()
        .with_frequency(200.0)
        .amplify(CurveNode::exponential(0.2, 0.01, 0.1));

    let node = rattle.mix(body, 0.5).gain(2.0);

    Voice::one_shot(VoiceKind::Snare, node.boxed(), SNARE_DURATION)
}
