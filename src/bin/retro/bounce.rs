//! `bounce`: the live loop rendered offline in virtual time.
//!
//! Same transport, same scheduler, same timers as `play`. The only
//! difference is the clock: it advances by however many frames were just
//! rendered, so the result does not depend on machine speed.

use std::{path::Path, time::Duration};

use color_eyre::eyre::{bail, eyre, Result as EyreResult, WrapErr};
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::info;

use retro_tape::{
    engine::{offline::OfflineFactory, timer::DeadlineTimers},
    RetroConfig, Transport,
};

/// Frames rendered between timer checks (~5 ms at 48 kHz)
const BLOCK_FRAMES: usize = 256;

pub fn bounce(config: RetroConfig, output: &Path, seconds: f64, sample_rate: u32) -> EyreResult<()> {
    if !seconds.is_finite() || seconds <= 0.0 {
        bail!("--seconds must be positive, got {seconds}");
    }

    let factory = OfflineFactory::new(sample_rate as f32);
    let mut transport = Transport::new(config, factory, DeadlineTimers::new())?;
    if !transport.start() {
        bail!("offline context refused to open at {sample_rate} Hz");
    }
    let renderer = transport
        .factory()
        .renderer()
        .ok_or_else(|| eyre!("offline context has no renderer"))?;

    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(output, spec)
        .wrap_err_with(|| format!("failed to create {}", output.display()))?;

    let total_frames = (seconds * sample_rate as f64).round() as u64;
    let mut block = vec![0.0f32; BLOCK_FRAMES * 2];
    let mut written = 0u64;

    while written < total_frames {
        let frames = BLOCK_FRAMES.min((total_frames - written) as usize);
        let interleaved = &mut block[..frames * 2];
        renderer.render_interleaved(interleaved);

        for &sample in interleaved.iter() {
            writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
        }
        written += frames as u64;

        let elapsed = Duration::from_secs_f64(renderer.time());
        for handle in transport.timers_mut().advance_to(elapsed) {
            transport.fire(handle);
        }
    }

    let beats = transport
        .schedule_state()
        .map_or(0, |state| state.beat_index);
    transport.stop();
    writer.finalize()?;

    info!(
        path = %output.display(),
        seconds,
        beats,
        "bounce complete"
    );
    Ok(())
}
