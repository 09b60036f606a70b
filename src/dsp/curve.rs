//! One-shot parameter curves.

use crate::graph::node::RenderCtx;

/*
Parameter Curves
================

Every sound in the loop is a one-shot: it is struck, it decays, it is gone.
Nothing is held, so instead of an ADSR gate these voices use two automation
shapes that start the moment the voice starts.

Exponential ramp
----------------

    v(t) = from * (to / from) ^ (t / duration)      0 <= t < duration
    v(t) = to                                       t >= duration

Equal ratios in equal time, which is how both loudness and pitch are heard.
A ramp cannot cross or touch zero, so both ends are clamped to a tiny
positive floor. The "near-zero" kick pitch target (0.01 Hz) is fine.

Per sample the value is multiplied by a constant:

    step = (to / from) ^ (1 / (duration * sample_rate))

Set-target
----------

    v(t) = target + (from - target) * e^(-t / tau)

An RC-style approach that never quite arrives. After one time constant the
value has covered ~63% of the distance, after five ~99.3%.

Per sample:

    v = target + (v - target) * e^(-1 / (tau * sample_rate))

Both shapes restart from `from` on `reset()`.
*/

const MIN_LEVEL: f32 = 1e-6;
/// Distance from the target at which a set-target curve reports itself finished.
const TARGET_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveShape {
    Exponential { from: f32, to: f32, duration: f32 },
    Target { from: f32, target: f32, time_constant: f32 },
}

#[derive(Debug, Clone)]
pub struct Curve {
    shape: CurveShape,
    value: f32,
    elapsed_samples: u64,
}

impl Curve {
    pub fn exponential(from: f32, to: f32, duration: f32) -> Self {
        let shape = CurveShape::Exponential {
            from: from.max(MIN_LEVEL),
            to: to.max(MIN_LEVEL),
            duration: duration.max(crate::MIN_TIME),
        };
        Self::from_shape(shape)
    }

    pub fn target(from: f32, target: f32, time_constant: f32) -> Self {
        let shape = CurveShape::Target {
            from,
            target,
            time_constant: time_constant.max(crate::MIN_TIME),
        };
        Self::from_shape(shape)
    }

    fn from_shape(shape: CurveShape) -> Self {
        let mut curve = Self {
            shape,
            value: 0.0,
            elapsed_samples: 0,
        };
        curve.reset();
        curve
    }

    pub fn shape(&self) -> CurveShape {
        self.shape
    }

    /// Restart from the initial value.
    pub fn reset(&mut self) {
        self.elapsed_samples = 0;
        self.value = match self.shape {
            CurveShape::Exponential { from, .. } => from,
            CurveShape::Target { from, .. } => from,
        };
    }

    /// Current value, i.e. the next sample `next_sample` will return.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Closed-form value `seconds` after the start.
    pub fn value_at(&self, seconds: f32) -> f32 {
        let t = seconds.max(0.0);
        match self.shape {
            CurveShape::Exponential { from, to, duration } => {
                if t >= duration {
                    to
                } else {
                    from * (to / from).powf(t / duration)
                }
            }
            CurveShape::Target {
                from,
                target,
                time_constant,
            } => target + (from - target) * (-t / time_constant).exp(),
        }
    }

    pub fn is_finished(&self) -> bool {
        match self.shape {
            CurveShape::Exponential { to, .. } => self.value == to,
            CurveShape::Target { target, .. } => (self.value - target).abs() < TARGET_EPSILON,
        }
    }

    /// Emit the current value and advance one sample.
    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let out = self.value;
        self.elapsed_samples += 1;

        match self.shape {
            CurveShape::Exponential { from, to, duration } => {
                let total = (duration * sample_rate).max(1.0);
                if self.elapsed_samples as f32 >= total {
                    self.value = to;
                } else {
                    let step = (to / from).powf(1.0 / total);
                    let next = self.value * step;
                    // Rounding must not carry the ramp past its end point.
                    self.value = if to < from { next.max(to) } else { next.min(to) };
                }
            }
            CurveShape::Target {
                target,
                time_constant,
                ..
            } => {
                let decay = (-1.0 / (time_constant * sample_rate)).exp();
                self.value = target + (self.value - target) * decay;
            }
        }

        out
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(ctx.sample_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn run(curve: &mut Curve, seconds: f32) {
        for _ in 0..(seconds * SAMPLE_RATE) as usize {
            curve.next_sample(SAMPLE_RATE);
        }
    }

    #[test]
    fn exponential_reaches_target_within_duration() {
        let mut env = Curve::exponential(0.8, 0.01, 0.5);
        assert!((env.value() - 0.8).abs() < 1e-6);

        run(&mut env, 0.25);
        // Halfway through an exponential ramp is the geometric mean.
        let expected = (0.8f32 * 0.01).sqrt();
        assert!(
            (env.value() - expected).abs() / expected < 0.01,
            "midpoint {} != {}",
            env.value(),
            expected
        );

        run(&mut env, 0.26);
        assert_eq!(env.value(), 0.01);
        assert!(env.is_finished());
    }

    #[test]
    fn exponential_decays_monotonically() {
        let mut env = Curve::exponential(150.0, 0.01, 0.5);
        let mut previous = f32::INFINITY;
        for _ in 0..(0.6 * SAMPLE_RATE) as usize {
            let v = env.next_sample(SAMPLE_RATE);
            assert!(v <= previous);
            assert!(v > 0.0);
            previous = v;
        }
    }

    #[test]
    fn exponential_clamps_zero_endpoints() {
        let env = Curve::exponential(0.0, 0.0, 0.1);
        assert!(env.value() > 0.0);
        assert!(env.value_at(1.0) > 0.0);
    }

    #[test]
    fn target_follows_time_constant() {
        let mut env = Curve::target(0.3, 0.0, 0.1);
        run(&mut env, 0.1);
        let expected = 0.3 * (-1.0f32).exp();
        assert!(
            (env.value() - expected).abs() < 1e-3,
            "after one tau: {} != {}",
            env.value(),
            expected
        );
        assert!((env.value_at(0.1) - expected).abs() < 1e-6);
        assert!(!env.is_finished());

        run(&mut env, 1.0);
        assert!(env.is_finished());
    }

    #[test]
    fn reset_restarts_curve() {
        let mut env = Curve::exponential(1.0, 0.1, 0.01);
        run(&mut env, 0.02);
        assert!(env.is_finished());
        env.reset();
        assert_eq!(env.value(), 1.0);
        assert!(!env.is_finished());
    }
}
