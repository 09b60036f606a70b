use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Parallel Signal Mixing
======================

Mix renders two sources and blends them linearly:

    out = A * (1 - balance) + B * balance

  balance = 0.0 → all A
  balance = 0.5 → half of each
  balance = 1.0 → all B

A 50/50 linear blend halves each layer, so layered voices usually follow it
with a `.gain()` to bring the sum back up. The snare does exactly that:

  let rattle = OscNode::noise()
      .through(FilterNode::highpass(1_000.0))
      .amplify(CurveNode::exponential(0.4, 0.01, 0.2));
  let body = OscNode::triangle()
      .with_frequency(200.0)
      .amplify(CurveNode::exponential(0.2, 0.01, 0.1));

  let snare = rattle.mix(body, 0.5).gain(2.0);   // rattle + body

Both sources receive note events, and each layer keeps its own envelope.
*/

pub struct Mix<A, B> {
    pub source_a: A,
    pub source_b: B,
    pub balance: f32, // 0.0 = all A, 1.0 = all B, 0.5 = equal mix
    temp_buffer: Vec<f32>,
}

impl<A, B> Mix<A, B> {
    pub fn new(source_a: A, source_b: B, balance: f32) -> Self {
        Mix {
            source_a,
            source_b,
            balance: balance.clamp(0.0, 1.0),
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<S: GraphNode, M: GraphNode> GraphNode for Mix<S, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source_a.render_block(out, ctx);

        let weight_a = 1.0 - self.balance;
        let weight_b = self.balance;
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            let frames = &mut self.temp_buffer[..chunk.len()];
            frames.fill(0.0);
            self.source_b.render_block(frames, ctx);

            for (o, b) in chunk.iter_mut().zip(frames.iter()) {
                *o = (*o * weight_a) + (*b * weight_b);
            }
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source_a.note_on(ctx);
        self.source_b.note_on(ctx);
    }

    fn is_active(&self) -> bool {
        self.source_a.is_active() || self.source_b.is_active()
    }
}
