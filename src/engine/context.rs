//! The boundary between the scheduler and whatever makes sound.

use crate::{config::CompressorSettings, error::Result, voices::Voice};

/// A running audio output with its own clock.
///
/// Time is in seconds on the context's clock, which starts at zero when the
/// context opens and never runs backwards. Voices are handed over with an
/// absolute start time; the context owns them from then on.
pub trait AudioContext {
    fn sample_rate(&self) -> f32;

    /// Seconds of audio rendered so far.
    fn current_time(&self) -> f64;

    /// Put a compressor on the master bus, replacing any previous settings.
    fn install_compressor(&mut self, settings: CompressorSettings) -> Result<()>;

    /// Start `voice` at `at` seconds. A time already in the past starts it
    /// as soon as possible.
    fn schedule(&mut self, at: f64, voice: Voice) -> Result<()>;

    /// Silence the output and release the device. Further calls to
    /// `schedule` fail with [`RetroError::ContextClosed`](crate::RetroError::ContextClosed).
    fn close(&mut self);

    fn is_closed(&self) -> bool;

    /// Move recently rendered mono samples into `sink`, for display.
    fn drain_monitor(&mut self, _sink: &mut Vec<f32>) {}
}

/// Opens a fresh [`AudioContext`] each time the transport starts.
pub trait ContextFactory {
    fn open(&mut self) -> Result<Box<dyn AudioContext>>;
}

impl<F: ContextFactory + ?Sized> ContextFactory for Box<F> {
    fn open(&mut self) -> Result<Box<dyn AudioContext>> {
        (**self).open()
    }
}
