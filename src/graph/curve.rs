use crate::{
    dsp::curve::Curve,
    graph::node::{GraphNode, RenderCtx},
};

/// A one-shot automation curve as a signal.
///
/// Output is the curve value, so the node works both as an amplitude
/// envelope (`.amplify(CurveNode::...)`) and as a sweep driving a parameter
/// (`.modulate(CurveNode::..., param, 1.0)`). `note_on` restarts it.
pub struct CurveNode {
    curve: Curve,
}

impl CurveNode {
    /// Exponential ramp from `from` to `to` over `duration` seconds.
    pub fn exponential(from: f32, to: f32, duration: f32) -> Self {
        Self {
            curve: Curve::exponential(from, to, duration),
        }
    }

    /// Exponential approach from `from` towards `target` with time constant `tau`.
    pub fn target(from: f32, target: f32, time_constant: f32) -> Self {
        Self {
            curve: Curve::target(from, target, time_constant),
        }
    }

    pub fn value(&self) -> f32 {
        self.curve.value()
    }
}

impl GraphNode for CurveNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.curve.render(out, ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.curve.reset();
    }

    fn is_active(&self) -> bool {
        !self.curve.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{extensions::NodeExt, oscillator::OscNode};

    fn ctx() -> RenderCtx {
        RenderCtx::from_freq(48_000.0, 440.0, 1.0)
    }

    #[test]
    fn envelope_shapes_amplitude() {
        let mut voice = OscNode::square()
            .with_frequency(100.0)
            .amplify(CurveNode::exponential(0.8, 0.01, 0.05));
        let mut buffer = vec![0.0f32; 4800];
        voice.render_block(&mut buffer, &ctx());

        assert!((buffer[0].abs() - 0.8).abs() < 1e-6);
        let tail = buffer[4000..].iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!(tail <= 0.0101, "tail should sit at the end level, got {tail}");
    }

    #[test]
    fn finishes_and_restarts() {
        let mut node = CurveNode::exponential(1.0, 0.5, 0.001);
        let mut buffer = vec![0.0f32; 128];
        node.render_block(&mut buffer, &ctx());
        assert!(!node.is_active());

        node.note_on(&ctx());
        assert!(node.is_active());
        assert_eq!(node.value(), 1.0);
    }
}
