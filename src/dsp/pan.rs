//! Equal-power stereo placement of a mono source.

use std::f32::consts::FRAC_PI_2;

/// Static left/right gains for one pan position.
///
/// Position -1.0 is hard left, 0.0 centre, +1.0 hard right. Gains follow a
/// quarter sine so `left² + right² == 1` at every position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pan {
    position: f32,
    left: f32,
    right: f32,
}

impl Pan {
    pub fn new(position: f32) -> Self {
        let position = position.clamp(-1.0, 1.0);
        let angle = (position + 1.0) * 0.5 * FRAC_PI_2;
        Self {
            position,
            left: angle.cos(),
            right: angle.sin(),
        }
    }

    pub fn center() -> Self {
        Self::new(0.0)
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn gains(&self) -> (f32, f32) {
        (self.left, self.right)
    }

    /// Add a mono block into a stereo bus.
    #[inline]
    pub fn mix_into(&self, mono: &[f32], left: &mut [f32], right: &mut [f32]) {
        for ((m, l), r) in mono.iter().zip(left.iter_mut()).zip(right.iter_mut()) {
            *l += m * self.left;
            *r += m * self.right;
        }
    }
}

impl Default for Pan {
    fn default() -> Self {
        Self::center()
    }
}
