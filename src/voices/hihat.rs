//! Closed hi-hat voice: white noise above 6 kHz, 0.15 → 0.01 in 50 ms.

use rand::Rng;

use crate::{
    error::Result,
    graph::{curve::CurveNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode},
};

use super::{Voice, VoiceKind};

pub const HIHAT_DURATION: f64 = 0.1;

pub fn hihat<R: Rng + ?Sized>(rng: &mut R) -> Result<Voice> {
    let node = OscNode::noise()
        .with_seed(rng.gen())
        .through(FilterNode::highpass(6_000.0))
        .amplify(CurveNode::exponential(0.15, 0.01, 0.05));

    Voice::one_shot(VoiceKind::HiHat, node.boxed(), HIHAT_DURATION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voices::test_support::{peak, render};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn hihat_is_short_and_quiet() {
        let mut voice = hihat(&mut StdRng::seed_from_u64(2)).unwrap();
        assert_eq!(voice.duration(), Some(HIHAT_DURATION));

        let out = render(&mut voice, 0.1);
        assert!(peak(&out) <= 0.3);
        assert!(peak(&out[2_400..]) < 0.03, "should have decayed after 50 ms");
    }
}
