//! Tempo, timing and mix settings for the music loop.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::error::{Result, RetroError};

/// Tempo range the scheduler accepts, in beats per minute.
pub const BPM_RANGE: std::ops::RangeInclusive<f64> = 1.0..=1000.0;

/// Master-bus dynamics settings.
///
/// Defaults squash the mix the way an overdriven cassette deck does.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorSettings {
    pub threshold_db: f32,
    pub knee_db: f32,
    pub ratio: f32,
    /// Seconds
    pub attack: f32,
    /// Seconds
    pub release: f32,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            threshold_db: -24.0,
            knee_db: 30.0,
            ratio: 12.0,
            attack: 0.003,
            release: 0.25,
        }
    }
}

/// Everything the transport needs to run the loop.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RetroConfig {
    /// Tempo in beats per minute
    pub bpm: f64,
    /// Wall-clock delay between scheduler polls
    pub lookahead_ms: u64,
    /// How far past the audio clock the scheduler fills, in seconds
    pub schedule_ahead: f64,
    /// Gap between `start()` and the first beat, in seconds
    pub start_delay: f64,
    /// Probability of the off-beat kick on the third beat of each bar
    pub syncopation: f64,
    /// Level of the continuous hiss bed
    pub noise_floor_gain: f32,
    pub compressor: CompressorSettings,
    /// Fixed RNG seed. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for RetroConfig {
    fn default() -> Self {
        Self {
            bpm: 105.0,
            lookahead_ms: 25,
            schedule_ahead: 0.1,
            start_delay: 0.1,
            syncopation: 0.7,
            noise_floor_gain: 0.05,
            compressor: CompressorSettings::default(),
            seed: None,
        }
    }
}

impl RetroConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tempo in beats per minute
    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn lookahead_ms(mut self, ms: u64) -> Self {
        self.lookahead_ms = ms;
        self
    }

    pub fn schedule_ahead(mut self, seconds: f64) -> Self {
        self.schedule_ahead = seconds;
        self
    }

    pub fn syncopation(mut self, probability: f64) -> Self {
        self.syncopation = probability;
        self
    }

    pub fn compressor(mut self, settings: CompressorSettings) -> Self {
        self.compressor = settings;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }

    pub fn lookahead(&self) -> Duration {
        Duration::from_millis(self.lookahead_ms)
    }

    /// Check the timing relationships the scheduler relies on.
    ///
    /// The poll interval must be shorter than the horizon or beats can be
    /// requested after their start time has already passed.
    pub fn validate(&self) -> Result<()> {
        if !BPM_RANGE.contains(&self.bpm) {
            return Err(RetroError::InvalidConfig(format!(
                "bpm must be within {}..={}, got {}",
                BPM_RANGE.start(),
                BPM_RANGE.end(),
                self.bpm
            )));
        }
        if self.lookahead_ms == 0 {
            return Err(RetroError::InvalidConfig(
                "lookahead_ms must be non-zero".into(),
            ));
        }
        if !self.schedule_ahead.is_finite() || self.schedule_ahead <= 0.0 {
            return Err(RetroError::InvalidConfig(format!(
                "schedule_ahead must be positive, got {}",
                self.schedule_ahead
            )));
        }
        if self.lookahead().as_secs_f64() >= self.schedule_ahead {
            return Err(RetroError::InvalidConfig(format!(
                "poll interval {}ms must be shorter than the {}s horizon",
                self.lookahead_ms, self.schedule_ahead
            )));
        }
        if !self.start_delay.is_finite() || self.start_delay < 0.0 {
            return Err(RetroError::InvalidConfig(format!(
                "start_delay must be non-negative, got {}",
                self.start_delay
            )));
        }
        if !(0.0..=1.0).contains(&self.syncopation) {
            return Err(RetroError::InvalidConfig(format!(
                "syncopation must be a probability, got {}",
                self.syncopation
            )));
        }
        if !self.noise_floor_gain.is_finite() || self.noise_floor_gain < 0.0 {
            return Err(RetroError::InvalidConfig(format!(
                "noise_floor_gain must be non-negative, got {}",
                self.noise_floor_gain
            )));
        }
        let c = &self.compressor;
        // Range checks also reject NaN
        let in_range = (-100.0..=0.0).contains(&c.threshold_db)
            && (0.0..=40.0).contains(&c.knee_db)
            && (1.0..=20.0).contains(&c.ratio)
            && c.attack > 0.0
            && c.attack <= 1.0
            && c.release > 0.0
            && c.release <= 1.0;
        if !in_range {
            return Err(RetroError::InvalidConfig(format!(
                "compressor settings out of range: {c:?}"
            )));
        }
        Ok(())
    }
}
