//! Chord note voice.
//!
//! Chords are three of these, one per pitch. Notes alternate waveform by
//! position in the chord (triangle, sine, triangle) so the stack is not a
//! single timbre, and each gets its own flutter and a random static place in
//! the middle half of the stereo field.

use rand::Rng;

use crate::{
    error::Result,
    graph::{
        curve::CurveNode,
        extensions::NodeExt,
        oscillator::{OscNode, OscParam},
    },
};

use super::{check_frequency, Voice, VoiceKind, Wobble};

pub const CHORD_NOTE_DURATION: f64 = 0.7;
const MAX_SPREAD: f32 = 0.5;

pub fn chord_note<R: Rng + ?Sized>(index: usize, frequency: f32, rng: &mut R) -> Result<Voice> {
    check_frequency(VoiceKind::ChordNote, frequency)?;
    let flutter = Wobble::flutter(rng);
    let pan = rng.gen_range(-MAX_SPREAD..=MAX_SPREAD);

    let osc = if index % 2 == 0 {
        OscNode::triangle()
    } else {
        OscNode::sine()
    };

    let node = osc
        .with_frequency(frequency)
        .modulate(flutter.lfo(), OscParam::Frequency, flutter.depth)
        .amplify(CurveNode::exponential(0.05, 0.001, 0.6));

    Voice::new(
        VoiceKind::ChordNote,
        node.boxed(),
        Some(CHORD_NOTE_DURATION),
        pan,
    )
}
