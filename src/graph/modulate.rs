use crate::{
    dsp::modulate::block_average,
    graph::node::{GraphNode, Modulatable, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Modulate Node
=============

Connects a modulation source to a parameter on another node:

    modulated_value = base_value + (source × depth)

  // Wow: slow pitch wobble on the bass
  OscNode::sawtooth()
      .with_frequency(65.41)
      .modulate(LfoNode::sine(1.0), OscParam::Frequency, 2.0);

  // Sweep: the curve value becomes the cutoff
  FilterNode::lowpass(0.0)
      .modulate(CurveNode::exponential(400.0, 200.0, 0.3), FilterParam::Cutoff, 1.0);

The source is rendered for the block, averaged, and applied once before the
target renders. See `dsp/modulate.rs` for the block-rate tradeoffs.
*/

pub struct Modulate<S, L>
where
    S: GraphNode + Modulatable,
    L: GraphNode,
{
    source: S,            // The node being modulated
    lfo: L,               // The modulation source
    param: S::Param,      // Which parameter to modulate
    depth: f32,           // Modulation amount (scales source output)
    lfo_buffer: Vec<f32>, // Temp buffer for modulator output
}

impl<S, L> Modulate<S, L>
where
    S: GraphNode + Modulatable,
    L: GraphNode,
{
    pub fn new(source: S, lfo: L, param: S::Param, depth: f32) -> Self {
        Self {
            source,
            lfo,
            param,
            depth,
            lfo_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S, L> GraphNode for Modulate<S, L>
where
    S: GraphNode + Modulatable,
    L: GraphNode,
{
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        // One parameter update per MAX_BLOCK_SIZE frames at most
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            let len = chunk.len();
            self.lfo.render_block(&mut self.lfo_buffer[..len], ctx);
            let lfo_avg = block_average(&self.lfo_buffer[..len]);

            let base_value = self.source.get_param(self.param);
            let modulation = lfo_avg * self.depth;
            self.source
                .apply_modulation(self.param, base_value, modulation);

            self.source.render_block(chunk, ctx);
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source.note_on(ctx);
        self.lfo.note_on(ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}
