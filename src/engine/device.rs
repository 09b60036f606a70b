//! Realtime output through the default cpal device.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{info, warn};

use crate::{
    config::CompressorSettings,
    engine::{
        context::{AudioContext, ContextFactory},
        mixer::Mixer,
    },
    error::{Result, RetroError},
    voices::Voice,
};

/// Voices and settings in flight to the audio thread.
const COMMAND_CAPACITY: usize = 1024;
/// Finished voices waiting for the control thread to free them.
const GRAVEYARD_CAPACITY: usize = 1024;
/// Mono samples kept for the oscilloscope (~170 ms at 48 kHz).
const SCOPE_CAPACITY: usize = 8192;

/// Messages from the control thread to the audio callback.
pub enum MixerCommand {
    Start { at: f64, voice: Voice },
    Compressor(CompressorSettings),
}

/// An open output stream plus the queues feeding it.
///
/// The mixer lives inside the audio callback. This side only pushes commands
/// and reads back the frame clock, so nothing here blocks the audio thread.
/// Voices come back through the graveyard ring and are freed here.
pub struct DeviceContext {
    stream: Option<cpal::Stream>,
    commands: Producer<MixerCommand>,
    graveyard: Consumer<Voice>,
    scope: Consumer<f32>,
    clock: Arc<AtomicU64>,
    dropped: Arc<AtomicU64>,
    reported_drops: u64,
    sample_rate: f32,
}

impl DeviceContext {
    pub fn open() -> Result<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(RetroError::NoDevice)?;
        let supported = device.default_output_config()?;

        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(RetroError::UnsupportedFormat(format!(
                "{:?}",
                supported.sample_format()
            )));
        }

        let sample_rate = supported.sample_rate().0 as f32;
        let channels = supported.channels() as usize;
        let config: cpal::StreamConfig = supported.into();

        let (commands, mut command_rx) = RingBuffer::<MixerCommand>::new(COMMAND_CAPACITY);
        let (mut graveyard_tx, graveyard) = RingBuffer::<Voice>::new(GRAVEYARD_CAPACITY);
        let (mut scope_tx, scope) = RingBuffer::<f32>::new(SCOPE_CAPACITY);
        let clock = Arc::new(AtomicU64::new(0));
        let dropped = Arc::new(AtomicU64::new(0));

        let mut mixer = Mixer::new(sample_rate);
        let callback_clock = Arc::clone(&clock);
        let callback_dropped = Arc::clone(&dropped);

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                while let Ok(command) = command_rx.pop() {
                    match command {
                        MixerCommand::Start { at, voice } => {
                            if mixer.add(at, voice).is_err() {
                                callback_dropped.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                        MixerCommand::Compressor(settings) => mixer.set_compressor(settings),
                    }
                }

                mixer.render_interleaved(data, channels, |sample| {
                    // Scope is best effort; a full ring just loses samples
                    let _ = scope_tx.push(sample);
                });
                // Whatever does not fit stays in the mixer until next callback
                while !graveyard_tx.is_full() {
                    let Some(voice) = mixer.pop_retired() else {
                        break;
                    };
                    let _ = graveyard_tx.push(voice);
                }
                callback_clock.store(mixer.frame(), Ordering::Release);
            },
            |err| warn!(%err, "output stream error"),
            None,
        )?;
        stream.play()?;

        let name = device.name().unwrap_or_else(|_| "unknown".into());
        info!(device = %name, sample_rate, channels, "audio device opened");

        Ok(Self {
            stream: Some(stream),
            commands,
            graveyard,
            scope,
            clock,
            dropped,
            reported_drops: 0,
            sample_rate,
        })
    }

    /// Voices the audio thread had to discard because its pool was full.
    pub fn dropped_voices(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Free the voices the audio thread has finished with.
    fn collect_retired(&mut self) -> usize {
        let mut freed = 0;
        while let Ok(voice) = self.graveyard.pop() {
            drop(voice);
            freed += 1;
        }
        freed
    }

    fn push(&mut self, command: MixerCommand) -> Result<()> {
        if self.stream.is_none() {
            return Err(RetroError::ContextClosed);
        }
        self.commands
            .push(command)
            .map_err(|_| RetroError::QueueFull)
    }
}

impl AudioContext for DeviceContext {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn current_time(&self) -> f64 {
        self.clock.load(Ordering::Acquire) as f64 / self.sample_rate as f64
    }

    fn install_compressor(&mut self, settings: CompressorSettings) -> Result<()> {
        self.push(MixerCommand::Compressor(settings))
    }

    fn schedule(&mut self, at: f64, voice: Voice) -> Result<()> {
        let dropped = self.dropped_voices();
        if dropped > self.reported_drops {
            warn!(
                dropped = dropped - self.reported_drops,
                "audio thread discarded voices"
            );
            self.reported_drops = dropped;
        }
        self.collect_retired();
        self.push(MixerCommand::Start { at, voice })
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(err) = stream.pause() {
                warn!(%err, "failed to pause output stream");
            }
            drop(stream);
            let freed = self.collect_retired();
            info!(freed, "audio device closed");
        }
    }

    fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    fn drain_monitor(&mut self, sink: &mut Vec<f32>) {
        self.collect_retired();
        while let Ok(sample) = self.scope.pop() {
            sink.push(sample);
        }
    }
}

impl Drop for DeviceContext {
    fn drop(&mut self) {
        self.close();
    }
}

/// Opens the system's default output device.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeviceFactory;

impl DeviceFactory {
    pub fn new() -> Self {
        Self
    }
}

impl ContextFactory for DeviceFactory {
    fn open(&mut self) -> Result<Box<dyn AudioContext>> {
        Ok(Box::new(DeviceContext::open()?))
    }
}
