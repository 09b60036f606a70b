//! Kick drum voice.
//!
//! A sine whose pitch falls from 150 Hz towards nothing over half a second.
//! The first few milliseconds sweep through the audible "click", the rest is
//! the boom. Amplitude falls 0.8 → 0.01 on the same time scale.

use crate::{
    error::Result,
    graph::{
        curve::CurveNode,
        extensions::NodeExt,
        oscillator::{OscNode, OscParam},
    },
};

use super::{Voice, VoiceKind};

pub const KICK_DURATION: f64 = 0.5;

pub fn kick() -> Result<Voice> {
    let node = OscNode::sine()
        // Base of zero: the curve value is the pitch
        .with_frequency(0.0)
        .modulate(
            CurveNode::exponential(150.0, 0.01, KICK_DURATION as f32),
            OscParam::Frequency,
            1.0,
        )
        .amplify(CurveNode::exponential(0.8, 0.01, KICK_DURATION as f32));

    Voice::one_shot(VoiceKind::Kick, node.boxed(), KICK_DURATION)
}
