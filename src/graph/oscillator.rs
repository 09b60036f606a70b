use crate::dsp::oscillator::OscillatorBlock;
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};

/*
Audio Oscillator
================

The raw material every voice in the loop is carved from.

Waveform Types and Where They Show Up:
--------------------------------------

Sine: A single partial, no overtones.
  - Kick body (with a pitch drop), odd-indexed chord notes

Sawtooth: Every harmonic, falling off as 1/n.
  - Bass, darkened by a closing lowpass

Square: Odd harmonics, 1/n.
  - Not used by the stock voices, kept for sound design

Triangle: Odd harmonics falling off as 1/n², soft and round.
  - Snare body, even-indexed chord notes

Noise: Flat spectrum, no pitch.
  - Snare rattle, hi-hat, tape hiss

Pitch
-----

A node either tracks `ctx.frequency` or pins its own with `with_frequency`.
Every voice here pins its pitch: the pattern decides the note, not the host.
Pinned pitch is the modulation base, so a sweep written as

    OscNode::sine()
        .with_frequency(0.0)
        .modulate(CurveNode::exponential(150.0, 0.01, 0.5), OscParam::Frequency, 1.0)

plays the curve value directly as the oscillator frequency.

Detune is in cents: frequency * 2^(cents / 1200).
*/

pub struct OscNode {
    osc: OscillatorBlock,
    /// Fixed frequency (Hz). If Some, ignores ctx.frequency and uses this instead.
    base_frequency: Option<f32>,
    /// Current frequency after modulation (only used when base_frequency is Some)
    current_frequency: f32,
    /// Detune in cents. 100 cents = 1 semitone.
    detune_cents: f32,
    /// Detune after modulation
    current_detune: f32,
    start_phase: f32,
}

/// Parameters that can be modulated on an oscillator
#[derive(Clone, Copy, Debug)]
pub enum OscParam {
    /// Oscillator frequency in Hz
    Frequency,
    /// Detune in cents (100 cents = 1 semitone)
    Detune,
}

impl OscNode {
    fn new(osc: OscillatorBlock) -> Self {
        Self {
            osc,
            base_frequency: None,
            current_frequency: 440.0,
            detune_cents: 0.0,
            current_detune: 0.0,
            start_phase: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorBlock::sine())
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorBlock::sawtooth())
    }

    pub fn square() -> Self {
        Self::new(OscillatorBlock::square())
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorBlock::triangle())
    }

    pub fn noise() -> Self {
        Self::new(OscillatorBlock::noise())
    }

    /// Set a fixed frequency, ignoring the pitch carried in RenderCtx.
    ///
    /// The fixed frequency becomes the base for `.modulate()` on
    /// `OscParam::Frequency`.
    pub fn with_frequency(mut self, freq: f32) -> Self {
        self.base_frequency = Some(freq);
        self.current_frequency = freq;
        self
    }

    /// Set detune in cents (100 cents = 1 semitone).
    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self.current_detune = cents;
        self
    }

    /// Seed the noise source so seeded sessions render identically.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.osc = self.osc.with_seed(seed);
        self
    }

    /// Start from a normalized phase in [0, 1).
    pub fn with_phase(mut self, phase: f32) -> Self {
        self.osc.set_phase(phase);
        self.start_phase = self.osc.phase();
        self
    }

    /// Frequency the next block will render at, before detune.
    pub fn current_frequency(&self) -> f32 {
        self.current_frequency
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let base_freq = if self.base_frequency.is_some() {
            self.current_frequency
        } else {
            ctx.frequency
        };

        let final_freq = if self.current_detune != 0.0 {
            base_freq * 2.0_f32.powf(self.current_detune / 1200.0)
        } else {
            base_freq
        };

        let modified_ctx = RenderCtx {
            frequency: final_freq,
            ..*ctx
        };
        self.osc.render(out, &modified_ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        if let Some(base) = self.base_frequency {
            self.current_frequency = base;
        }
        self.current_detune = self.detune_cents;
        self.osc.set_phase(self.start_phase);
    }
}

impl Modulatable for OscNode {
    type Param = OscParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            OscParam::Frequency => self.base_frequency.unwrap_or(440.0),
            OscParam::Detune => self.detune_cents,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        match param {
            OscParam::Frequency => {
                // Sweeps may head towards zero; only negative pitch is nonsense
                self.current_frequency = (base + modulation).clamp(0.0, 20_000.0);
            }
            OscParam::Detune => {
                self.current_detune = (base + modulation).clamp(-200.0, 200.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let ctx = RenderCtx::from_freq(sample_rate, 440.0, 1.0);
        let mut synth = OscNode::sine();

        let mut buffer = vec![0.0f32; 128];
        synth.render_block(&mut buffer, &ctx);

        let sample_index = 12;
        let expected = (TAU * 440.0 * sample_index as f32 / sample_rate).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn fixed_frequency_ignores_context() {
        let mut a = OscNode::sine().with_frequency(220.0);
        let mut b = OscNode::sine().with_frequency(220.0);
        let mut buf_a = vec![0.0f32; 256];
        let mut buf_b = vec![0.0f32; 256];

        a.render_block(&mut buf_a, &RenderCtx::from_freq(48_000.0, 440.0, 1.0));
        b.render_block(&mut buf_b, &RenderCtx::from_freq(48_000.0, 1_000.0, 1.0));

        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn frequency_modulation_clamps_at_zero() {
        let mut osc = OscNode::sine().with_frequency(10.0);
        osc.apply_modulation(OscParam::Frequency, 10.0, -50.0);
        assert_eq!(osc.current_frequency(), 0.0);

        osc.apply_modulation(OscParam::Frequency, 10.0, 1e6);
        assert_eq!(osc.current_frequency(), 20_000.0);
    }

    #[test]
    fn note_on_restores_start_phase_and_pitch() {
        let ctx = RenderCtx::from_freq(48_000.0, 440.0, 1.0);
        let mut osc = OscNode::sine().with_frequency(300.0).with_phase(0.25);
        let mut first = vec![0.0f32; 64];
        osc.render_block(&mut first, &ctx);
        assert!((first[0] - 1.0).abs() < 1e-6);

        osc.apply_modulation(OscParam::Frequency, 300.0, 50.0);
        osc.note_on(&ctx);
        let mut again = vec![0.0f32; 64];
        osc.render_block(&mut again, &ctx);
        assert_eq!(first, again);
    }

    #[test]
    fn detune_raises_pitch() {
        let mut osc = OscNode::sawtooth().with_frequency(100.0).with_detune(1200.0);
        let ctx = RenderCtx::from_freq(48_000.0, 440.0, 1.0);
        let mut buffer = vec![0.0f32; 600];
        osc.render_block(&mut buffer, &ctx);

        // One octave up: 2.5 cycles of 200 Hz in 12.5 ms
        let wraps = buffer.windows(2).filter(|w| w[1] < w[0]).count();
        assert_eq!(wraps, 2);
    }

    #[test]
    fn detune_modulation_keeps_its_base() {
        let mut osc = OscNode::sine().with_frequency(220.0).with_detune(10.0);
        for _ in 0..5 {
            let base = osc.get_param(OscParam::Detune);
            osc.apply_modulation(OscParam::Detune, base, 30.0);
        }
        assert_eq!(osc.get_param(OscParam::Detune), 10.0);
        assert_eq!(osc.current_detune, 40.0);
    }
}
