//! Feed-forward dynamics compressor for the master bus.

use crate::config::CompressorSettings;

/*
Soft-Knee Compression
=====================

The static curve maps input level to output level, both in dB:

    output
      │                 ╱ ratio 1:1 (below knee)
      │              ╱
      │          ╭──────────── ratio R:1 (above knee)
      │       ╱
      │    ╱
      └──────────────────── input
              T-W/2  T  T+W/2

  below the knee     y = x
  inside the knee    y = x + (1/R - 1) * (x - T + W/2)^2 / (2W)
  above the knee     y = T + (x - T) / R

Gain reduction is `y - x`, always <= 0. It is smoothed with two one-pole
filters: the attack coefficient when reduction is increasing, the release
coefficient when it is letting go.

The detector is stereo-linked (peak of |L| and |R|) so the image does not
wander when one side is louder. Heavy settings (-24 dB threshold, 12:1) are
what give the loop its flattened, cassette-pumped feel.
*/

const DETECTOR_FLOOR_DB: f32 = -120.0;

#[inline]
fn amplitude_to_db(amplitude: f32) -> f32 {
    if amplitude <= 0.0 {
        DETECTOR_FLOOR_DB
    } else {
        (20.0 * amplitude.log10()).max(DETECTOR_FLOOR_DB)
    }
}

#[inline]
fn db_to_amplitude(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

pub struct Compressor {
    settings: CompressorSettings,
    gain_db: f32,
}

impl Compressor {
    pub fn new(settings: CompressorSettings) -> Self {
        Self {
            settings,
            gain_db: 0.0,
        }
    }

    pub fn settings(&self) -> CompressorSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: CompressorSettings) {
        self.settings = settings;
    }

    pub fn reset(&mut self) {
        self.gain_db = 0.0;
    }

    /// Current smoothed gain reduction in dB (zero or negative).
    pub fn gain_reduction_db(&self) -> f32 {
        self.gain_db
    }

    /// Output level for a steady input level, ignoring attack and release.
    pub fn static_curve(&self, input_db: f32) -> f32 {
        let CompressorSettings {
            threshold_db,
            knee_db,
            ratio,
            ..
        } = self.settings;
        let over = input_db - threshold_db;

        if 2.0 * over < -knee_db {
            input_db
        } else if knee_db > 0.0 && 2.0 * over.abs() <= knee_db {
            let x = over + knee_db / 2.0;
            input_db + (1.0 / ratio - 1.0) * x * x / (2.0 * knee_db)
        } else {
            threshold_db + over / ratio
        }
    }

    /// Compress a stereo block in place.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32], sample_rate: f32) {
        let attack = (-1.0 / (self.settings.attack.max(1e-5) * sample_rate)).exp();
        let release = (-1.0 / (self.settings.release.max(1e-5) * sample_rate)).exp();

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let level_db = amplitude_to_db(l.abs().max(r.abs()));
            let target = (self.static_curve(level_db) - level_db).min(0.0);

            let coeff = if target < self.gain_db { attack } else { release };
            self.gain_db = coeff * self.gain_db + (1.0 - coeff) * target;

            let gain = db_to_amplitude(self.gain_db);
            *l *= gain;
            *r *= gain;
        }
    }
}
