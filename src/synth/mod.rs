//! Turns beat directives into scheduled voices.
//!
//! This layer sits between the pattern and the audio context: one directive
//! becomes one voice (three for a chord), built fresh and handed to the
//! context with its absolute start time. Every voice is built and scheduled
//! on its own, so one failure costs only that sound.

use rand::Rng;
use tracing::{trace, warn};

use crate::{
    engine::context::AudioContext,
    error::Result,
    pattern::{BeatEvent, Directive},
    voices::{self, Voice},
};

/// Schedule every directive of `event` at beat time `at`.
///
/// Returns the number of voices the context accepted.
pub fn play_beat<R: Rng + ?Sized>(
    context: &mut dyn AudioContext,
    at: f64,
    event: &BeatEvent,
    rng: &mut R,
) -> usize {
    event
        .directives
        .iter()
        .map(|directive| play_directive(&mut *context, at, directive, &mut *rng))
        .sum()
}

/// Schedule one directive, logging and skipping any voice that fails.
pub fn play_directive<R: Rng + ?Sized>(
    context: &mut dyn AudioContext,
    at: f64,
    directive: &Directive,
    rng: &mut R,
) -> usize {
    let when = at + directive.offset();
    match directive {
        Directive::Kick => submit(context, when, voices::kick()),
        Directive::Snare => submit(context, when, voices::snare(rng)),
        Directive::HiHat { .. } => submit(context, when, voices::hihat(rng)),
        Directive::Bass { frequency, .. } => {
            submit(context, when, voices::bass(*frequency, rng))
        }
        Directive::Chord { frequencies } => frequencies
            .iter()
            .enumerate()
            .map(|(index, &frequency)| {
                submit(&mut *context, when, voices::chord_note(index, frequency, &mut *rng))
            })
            .sum(),
    }
}

/// Start the continuous hiss bed at the context's current time.
pub fn start_noise_floor<R: Rng + ?Sized>(
    context: &mut dyn AudioContext,
    gain: f32,
    rng: &mut R,
) -> Result<()> {
    let voice = voices::noise_floor(context.sample_rate(), gain, rng)?;
    let now = context.current_time();
    context.schedule(now, voice)
}

fn submit(context: &mut dyn AudioContext, at: f64, voice: Result<Voice>) -> usize {
    let scheduled = voice.and_then(|voice| {
        let kind = voice.kind();
        context.schedule(at, voice).map(|()| kind)
    });

    match scheduled {
        Ok(kind) => {
            trace!(kind = kind.label(), at, "voice scheduled");
            1
        }
        Err(err) => {
            warn!(%err, at, "voice skipped");
            0
        }
    }
}
