use crate::graph::node::{GraphNode, RenderCtx};

/// Serial chain: render `source`, then process the block in place with `filter`.
///
///   Through: [Source] ──→ [Effect] ──→ output
pub struct Through<S, F> {
    source: S,
    filter: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, filter: F) -> Self {
        Self { source, filter }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.filter.render_block(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source.note_on(ctx);
        self.filter.note_on(ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active() && self.filter.is_active()
    }
}
