use crate::{
    dsp::filter::{q_to_resonance, SVFilter},
    graph::node::{GraphNode, Modulatable, RenderCtx},
};

/*
State-Variable Filter Node
==========================

Wraps the TPT state-variable filter (see `dsp/filter.rs`) as an in-place
processor. Put it after a source with `.through()`:

  // Snare rattle: white noise with the low end removed
  OscNode::noise().through(FilterNode::highpass(1_000.0))

  // Tape hiss bed: darkened noise
  NoiseLoop::new(2.0, sample_rate, seed).through(FilterNode::lowpass(800.0))

Swept Cutoff
------------

The cutoff is modulatable. With a base of 0 Hz and a depth of 1, a curve
becomes the cutoff itself, which is how the bass closes from 400 to 200 Hz:

  FilterNode::lowpass(0.0)
      .with_q(2.0)
      .modulate(CurveNode::exponential(400.0, 200.0, 0.3), FilterParam::Cutoff, 1.0)

Cutoff modulation is clamped to 20 Hz - 20 kHz, resonance to [0, 0.98].
*/

#[derive(Clone, Copy, Debug)]
pub enum FilterParam {
    Cutoff,
    Resonance,
}

pub struct FilterNode {
    filter: SVFilter,
    base_cutoff: f32,
    base_resonance: f32,
}

impl FilterNode {
    fn from_filter(filter: SVFilter) -> Self {
        let base_cutoff = filter.cutoff_hz;
        FilterNode {
            filter,
            base_cutoff,
            base_resonance: 0.0,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::from_filter(SVFilter::lowpass(cutoff_hz))
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::from_filter(SVFilter::highpass(cutoff_hz))
    }

    pub fn with_resonance(mut self, resonance: f32) -> Self {
        self.filter.set_resonance(resonance);
        self.base_resonance = self.filter.resonance;
        self
    }

    /// Set damping as a quality factor (0.707 Butterworth, 2.0 peaky).
    pub fn with_q(self, q: f32) -> Self {
        self.with_resonance(q_to_resonance(q))
    }

    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.filter.resonance
    }
}

impl Modulatable for FilterNode {
    type Param = FilterParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            FilterParam::Cutoff => self.base_cutoff,
            FilterParam::Resonance => self.base_resonance,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        let final_value = base + modulation;
        match param {
            FilterParam::Cutoff => {
                self.base_cutoff = base;
                self.filter.set_cutoff(final_value.clamp(20.0, 20_000.0));
            }
            FilterParam::Resonance => {
                self.base_resonance = base;
                self.filter.set_resonance(final_value);
            }
        }
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.filter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn q_two_sets_resonance() {
        let node = FilterNode::lowpass(400.0).with_q(2.0);
        assert!((node.resonance() - 0.75).abs() < 1e-6);
        assert_eq!(node.get_param(FilterParam::Resonance), node.resonance());
    }

    #[test]
    fn cutoff_modulation_is_clamped() {
        let mut node = FilterNode::lowpass(0.0);
        node.apply_modulation(FilterParam::Cutoff, 0.0, 400.0);
        assert_eq!(node.cutoff(), 400.0);
        assert_eq!(node.get_param(FilterParam::Cutoff), 0.0);

        node.apply_modulation(FilterParam::Cutoff, 0.0, 1e9);
        assert_eq!(node.cutoff(), 20_000.0);

        node.apply_modulation(FilterParam::Cutoff, 0.0, -5.0);
        assert_eq!(node.cutoff(), 20.0);
    }

    #[test]
    fn note_on_clears_state() {
        let ctx = RenderCtx::from_freq(48_000.0, 440.0, 1.0);
        let mut node = FilterNode::lowpass(200.0);
        let mut loud = vec![1.0f32; 256];
        node.render_block(&mut loud, &ctx);

        node.note_on(&ctx);
        let mut silence = vec![0.0f32; 16];
        node.render_block(&mut silence, &ctx);
        assert!(silence.iter().all(|&s| s == 0.0));
    }
}
