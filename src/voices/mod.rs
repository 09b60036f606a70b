//! The loop's instruments.
//!
//! Each function builds one short-lived voice: a node graph plus the time it
//! is allowed to sound and where it sits in the stereo field. Voices are
//! fire-and-forget. Once handed to an [`AudioContext`](crate::engine::context::AudioContext)
//! nobody keeps a reference, and the mixer drops them when their duration is up.
//!
//! # Example
//!
//! ```ignore
//! use rand::SeedableRng;
//! use retro_tape::voices;
//!
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(7);
//! let kick = voices::kick()?;
//! let bass = voices::bass(65.41, &mut rng)?;
//! let note = voices::chord_note(0, 261.63, &mut rng)?;
//! ```

use rand::Rng;

use crate::{
    dsp::Pan,
    error::{Result, RetroError},
    graph::{lfo::LfoNode, node::GraphNode},
};

mod bass;
mod chord;
mod hihat;
mod kick;
mod noise_floor;
mod snare;

pub use bass::{bass, BASS_DURATION};
pub use chord::{chord_note, CHORD_NOTE_DURATION};
pub use hihat::{hihat, HIHAT_DURATION};
pub use kick::{kick, KICK_DURATION};
pub use noise_floor::{noise_floor, NOISE_LOOP_SECONDS};
pub use snare::{snare, SNARE_DURATION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceKind {
    Kick,
    Snare,
    HiHat,
    Bass,
    ChordNote,
    NoiseFloor,
}

impl VoiceKind {
    pub fn label(self) -> &'static str {
        match self {
            VoiceKind::Kick => "kick",
            VoiceKind::Snare => "snare",
            VoiceKind::HiHat => "hihat",
            VoiceKind::Bass => "bass",
            VoiceKind::ChordNote => "chord",
            VoiceKind::NoiseFloor => "noise",
        }
    }
}

/// A sound ready to be scheduled.
pub struct Voice {
    kind: VoiceKind,
    node: Box<dyn GraphNode>,
    /// Seconds the voice sounds for. `None` runs until the context closes.
    duration: Option<f64>,
    pan: Pan,
}

impl Voice {
    pub fn new(
        kind: VoiceKind,
        node: Box<dyn GraphNode>,
        duration: Option<f64>,
        pan: f32,
    ) -> Result<Self> {
        if let Some(d) = duration {
            if !d.is_finite() || d <= 0.0 {
                return Err(RetroError::InvalidVoice(format!(
                    "{} duration must be positive, got {d}",
                    kind.label()
                )));
            }
        }
        if !pan.is_finite() || !(-1.0..=1.0).contains(&pan) {
            return Err(RetroError::InvalidVoice(format!(
                "{} pan must be within [-1, 1], got {pan}",
                kind.label()
            )));
        }
        Ok(Self {
            kind,
            node,
            duration,
            pan: Pan::new(pan),
        })
    }

    /// A centred voice that stops after `duration` seconds.
    pub fn one_shot(kind: VoiceKind, node: Box<dyn GraphNode>, duration: f64) -> Result<Self> {
        Self::new(kind, node, Some(duration), 0.0)
    }

    /// A centred voice that runs until its context closes.
    pub fn continuous(kind: VoiceKind, node: Box<dyn GraphNode>) -> Result<Self> {
        Self::new(kind, node, None, 0.0)
    }

    pub fn kind(&self) -> VoiceKind {
        self.kind
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn pan(&self) -> Pan {
        self.pan
    }

    pub fn node_mut(&mut self) -> &mut dyn GraphNode {
        self.node.as_mut()
    }

    /// False once the voice's envelope has run out.
    pub fn is_active(&self) -> bool {
        self.node.is_active()
    }
}

impl std::fmt::Debug for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Voice")
            .field("kind", &self.kind)
            .field("duration", &self.duration)
            .field("pan", &self.pan.position())
            .finish_non_exhaustive()
    }
}

/// Tape-speed instability applied to a pitched voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wobble {
    /// Hz
    pub rate: f32,
    /// Peak pitch deviation in Hz
    pub depth: f32,
    /// Normalized start phase
    pub phase: f32,
}

impl Wobble {
    /// Slow wow: 0.5-1.5 Hz, ±2 Hz.
    pub fn wow<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            rate: rng.gen_range(0.5..=1.5),
            depth: 2.0,
            phase: rng.gen_range(0.0..1.0),
        }
    }

    /// Fast flutter: 6-8 Hz, ±4 Hz.
    pub fn flutter<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            rate: rng.gen_range(6.0..=8.0),
            depth: 4.0,
            phase: rng.gen_range(0.0..1.0),
        }
    }

    pub fn lfo(&self) -> LfoNode {
        LfoNode::sine(self.rate).with_phase(self.phase)
    }
}

pub(crate) fn check_frequency(kind: VoiceKind, frequency: f32) -> Result<()> {
    if frequency.is_finite() && frequency > 0.0 {
        Ok(())
    } else {
        Err(RetroError::InvalidVoice(format!(
            "{} frequency must be positive, got {frequency}",
            kind.label()
        )))
    }
}
