//! Parameter modulation primitives.

/*
Parameter Modulation
====================

    modulated_value = base_value + (modulator_output × depth)

Two kinds of modulator drive the voices in this crate:

  wobble    A bipolar LFO (-1..+1) on oscillator pitch. "Wow" is slow
            (0.5-1.5 Hz) and shallow (±2 Hz) on the bass; "flutter" is
            faster (6-8 Hz, ±4 Hz) on the chord notes.

  sweep     A curve that replaces the parameter outright. Use a base of 0
            and a depth of 1 so the curve value IS the parameter: the kick's
            150 Hz → 0.01 Hz pitch drop, the bass filter's 400 → 200 Hz close.


Block-Rate Modulation
---------------------

The modulator is rendered for the whole block, averaged, and applied once.
The mixer renders in 128-frame quanta (2.7 ms at 48 kHz), so even the 8 Hz
flutter gets ~46 updates per cycle.

The target node clamps. Oscillator frequency is kept in [0, 20000] Hz and
filter cutoff in [20, 20000] Hz.
*/

/// Calculate the average of a modulator signal over a block.
///
/// Used for block-rate modulation: we need one value to represent
/// the entire block's worth of modulator samples.
#[inline]
pub fn block_average(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f32>() / samples.len() as f32
}
