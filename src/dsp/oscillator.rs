use std::f32::consts::TAU;

use rand::{rngs::SmallRng, Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
Phase Accumulator
=================

Every periodic waveform here is a function of a normalized phase in [0, 1).
Each sample the phase advances by `frequency / sample_rate` and wraps:

    phase:  0.00  0.25  0.50  0.75  (1.00 → 0.00)
    sine:   0     +1    0     -1
    saw:    -1    -0.5  0     +0.5
    square: +1    +1    -1    -1
    tri:    0     +1    0     -1

The triangle is aligned with the sine so the two can be swapped on a chord
voice without a click at note start.

Noise ignores phase and draws uniform samples in [-1, 1) from a small,
seedable generator. Seeding it per voice keeps seeded runs reproducible.
*/

const DEFAULT_NOISE_SEED: u64 = 0x7A9E_5EED;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Saw,
    Square,
    Triangle,
    Noise,
}

pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
    rng: SmallRng,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            rng: SmallRng::seed_from_u64(DEFAULT_NOISE_SEED),
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Saw)
    }

    pub fn square() -> Self {
        Self::new(OscillatorWaveform::Square)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    pub fn noise() -> Self {
        Self::new(OscillatorWaveform::Noise)
    }

    /// Reseed the noise generator. No effect on periodic waveforms.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Jump to a normalized phase. Values outside [0, 1) wrap.
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase.rem_euclid(1.0);
    }

    /// Produce one sample and advance the phase by `increment` cycles.
    #[inline]
    pub fn next_sample(&mut self, increment: f32) -> f32 {
        let value = match self.waveform {
            OscillatorWaveform::Sine => (TAU * self.phase).sin(),
            OscillatorWaveform::Saw => 2.0 * self.phase - 1.0,
            OscillatorWaveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            OscillatorWaveform::Triangle => {
                let shifted = (self.phase + 0.25).fract();
                1.0 - 4.0 * (shifted - 0.5).abs()
            }
            OscillatorWaveform::Noise => self.rng.gen::<f32>() * 2.0 - 1.0,
        };

        self.phase += increment;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        value
    }

    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let increment = ctx.frequency.max(0.0) / ctx.sample_rate;
        for sample in out.iter_mut() {
            *sample = self.next_sample(increment);
        }
    }
}
