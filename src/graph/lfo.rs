use crate::{
    dsp::oscillator::OscillatorBlock,
    graph::node::{GraphNode, RenderCtx},
};

/*
LFO (Low Frequency Oscillator)
==============================

A bipolar oscillator at sub-audio rate, used as a modulation source. Its
frequency is its own; the pitch carried in the render context is ignored.

Tape Wobble
-----------

Cassette transports never run at a perfectly steady speed. Two slow pitch
wobbles imitate that:

  wow       0.5-1.5 Hz, ±2 Hz     bass
  flutter   6-8 Hz,     ±4 Hz     chord notes

Both start at a random phase per note so stacked chord tones drift apart
instead of bending in lockstep:

  let flutter = LfoNode::sine(7.0).with_phase(0.3);
  let note = OscNode::triangle()
      .with_frequency(261.63)
      .modulate(flutter, OscParam::Frequency, 4.0);
*/

pub struct LfoNode {
    osc: OscillatorBlock,
    frequency: f32, // Fixed frequency in Hz (ignores note context)
    start_phase: f32,
}

impl LfoNode {
    fn new(osc: OscillatorBlock, frequency: f32) -> Self {
        Self {
            osc,
            frequency,
            start_phase: 0.0,
        }
    }

    pub fn sine(frequency: f32) -> Self {
        Self::new(OscillatorBlock::sine(), frequency)
    }

    pub fn sawtooth(frequency: f32) -> Self {
        Self::new(OscillatorBlock::sawtooth(), frequency)
    }

    pub fn square(frequency: f32) -> Self {
        Self::new(OscillatorBlock::square(), frequency)
    }

    pub fn triangle(frequency: f32) -> Self {
        Self::new(OscillatorBlock::triangle(), frequency)
    }

    /// Start the cycle at a normalized phase in [0, 1).
    pub fn with_phase(mut self, phase: f32) -> Self {
        self.osc.set_phase(phase);
        self.start_phase = self.osc.phase();
        self
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }
}

impl GraphNode for LfoNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let lfo_ctx = RenderCtx::from_freq(ctx.sample_rate, self.frequency, 1.0);
        self.osc.render(out, &lfo_ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.osc.set_phase(self.start_phase);
    }
}
