use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::graph::node::{GraphNode, RenderCtx};

/// A pre-rendered buffer of white noise played on repeat.
///
/// The buffer is filled once at construction, so rendering is a copy. Used
/// for the continuous tape hiss bed, where a loop of a couple of seconds is
/// indistinguishable from fresh noise.
pub struct NoiseLoop {
    buffer: Vec<f32>,
    position: usize,
}

impl NoiseLoop {
    /// `seconds` of noise at `sample_rate`, at least one sample long.
    pub fn new(seconds: f32, sample_rate: f32, seed: u64) -> Self {
        let len = ((seconds * sample_rate) as usize).max(1);
        let mut rng = SmallRng::seed_from_u64(seed);
        let buffer = (0..len).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl GraphNode for NoiseLoop {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        let mut written = 0;
        while written < out.len() {
            let chunk = (out.len() - written).min(self.buffer.len() - self.position);
            out[written..written + chunk]
                .copy_from_slice(&self.buffer[self.position..self.position + chunk]);
            written += chunk;
            self.position = (self.position + chunk) % self.buffer.len();
        }
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RenderCtx {
        RenderCtx::from_freq(1_000.0, 0.0, 1.0)
    }

    #[test]
    fn buffer_matches_duration() {
        assert_eq!(NoiseLoop::new(2.0, 48_000.0, 1).len(), 96_000);
        assert_eq!(NoiseLoop::new(0.0, 48_000.0, 1).len(), 1);
    }

    #[test]
    fn output_repeats_with_period() {
        // 100 samples at 1 kHz
        let mut noise = NoiseLoop::new(0.1, 1_000.0, 42);
        let mut out = vec![0.0f32; 250];
        noise.render_block(&mut out, &ctx());

        assert_eq!(out[..100], out[100..200]);
        assert_eq!(out[..50], out[200..250]);
        assert!(out.iter().all(|s| (-1.0..1.0).contains(s)));
    }

    #[test]
    fn continues_across_blocks() {
        let mut whole = NoiseLoop::new(0.1, 1_000.0, 5);
        let mut split = NoiseLoop::new(0.1, 1_000.0, 5);

        let mut a = vec![0.0f32; 160];
        whole.render_block(&mut a, &ctx());

        let mut b = vec![0.0f32; 160];
        let (first, second) = b.split_at_mut(64);
        split.render_block(first, &ctx());
        split.render_block(second, &ctx());

        assert_eq!(a, b);
    }
}
